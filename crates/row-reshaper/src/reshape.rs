//! Derivation of the two event variants from a row body.

use rand::Rng;
use serde_json::{Map, Value};

/// Synthetic field carrying the zero-based row index.
pub const JOIN_COLUMN: &str = "join_col";

/// Synthetic categorical field of the augmented variant.
pub const ADDITIONAL_COLUMN: &str = "additional_col";

/// Values `additional_col` is drawn from. `b` is listed twice and so comes up
/// twice as often as the other letters.
pub const ADDITIONAL_VALUES: [&str; 6] = ["a", "i", "r", "b", "n", "b"];

/// Keys kept in the augmented variant.
pub const AUGMENTED_KEYS: [&str; 4] = ["listing_id", "date", ADDITIONAL_COLUMN, JOIN_COLUMN];

/// Row body plus `join_col`.
///
/// A `join_col` already present in the body keeps its position and takes
/// the new value.
pub fn base_variant(body: &Map<String, Value>, index: usize) -> Map<String, Value> {
    let mut event = body.clone();
    event.insert(JOIN_COLUMN.to_string(), Value::from(index));
    event
}

/// Base variant plus a random `additional_col`, restricted to [`AUGMENTED_KEYS`].
pub fn augmented_variant<R: Rng + ?Sized>(
    body: &Map<String, Value>,
    index: usize,
    rng: &mut R,
) -> Map<String, Value> {
    let letter = ADDITIONAL_VALUES[rng.random_range(0..ADDITIONAL_VALUES.len())];

    let mut event = base_variant(body, index);
    event.insert(ADDITIONAL_COLUMN.to_string(), Value::from(letter));
    event.retain(|key, _| AUGMENTED_KEYS.contains(&key.as_str()));
    event
}
