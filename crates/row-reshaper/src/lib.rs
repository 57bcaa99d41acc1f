//! Row reshaping for eventhub-sender
//!
//! Reads a CSV file whose `body` column holds one JSON object per row and
//! derives two event collections from it:
//!
//! - the **base** variant: the row's object plus `join_col`, the zero-based
//!   row index;
//! - the **augmented** variant: the base variant plus a random single-letter
//!   `additional_col`, restricted to `listing_id`, `date`, `additional_col`
//!   and `join_col`.
//!
//! ```rust,ignore
//! use rand::{rngs::StdRng, SeedableRng};
//! use row_reshaper::{load_variants, Config};
//!
//! let variants = load_variants("listings.csv", &Config::default(), &mut StdRng::from_os_rng())?;
//! println!("{} base / {} augmented", variants.base.len(), variants.augmented.len());
//! ```

mod error;
mod reader;
mod reshape;

pub use error::ReshapeError;
pub use reader::{load_variants, read_bodies, Config, Variants, DEFAULT_BODY_COLUMN};
pub use reshape::{
    augmented_variant, base_variant, ADDITIONAL_COLUMN, ADDITIONAL_VALUES, AUGMENTED_KEYS,
    JOIN_COLUMN,
};
