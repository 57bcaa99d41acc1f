//! Rate-limited batch producer for eventhub-sender
//!
//! This crate holds the part of the sender that actually paces traffic:
//!
//! - [`MessagePool`]: the in-memory collection a pacer drains. Every message
//!   gets a [`MessageId`] when the pool is built, so sent messages are removed
//!   by identity even when several messages carry the same JSON body.
//! - [`EventSink`]: the three-call contract (`create_batch`, `try_add`,
//!   `send_batch`) a destination has to provide.
//! - [`Pacer`]: sleeps for the configured interval, samples up to
//!   `batch_size` messages, hands them to the sink and repeats until the pool
//!   is empty.
//! - [`Orchestrator`]: runs any number of pacers as independent tasks and
//!   joins them, surfacing the first failure once every task has settled.
//!
//! # Example
//!
//! ```rust,ignore
//! use batch_pacer::{MessagePool, Orchestrator, Pacer, PacerConfig, PartitionId};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let pool = MessagePool::from_bodies(bodies);
//! let config = PacerConfig::new("original df").with_batch_size(10);
//! let pacer = Pacer::new(pool, PartitionId::default(), config, sink, StdRng::from_os_rng());
//!
//! let mut orchestrator = Orchestrator::new();
//! orchestrator.spawn(pacer);
//! let metrics = orchestrator.join_all().await?;
//! ```

mod error;
mod message;
mod orchestrator;
mod pacer;
mod sink;

pub use error::{BatchFull, PacerError};
pub use message::{Message, MessageId, MessagePool};
pub use orchestrator::Orchestrator;
pub use pacer::{Pacer, PacerConfig, PacerMetrics, DEFAULT_BATCH_SIZE, DEFAULT_INTERVAL};
pub use sink::{EventBatch, EventSink, PartitionId, DEFAULT_MAX_BATCH_BYTES};
