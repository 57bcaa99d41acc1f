//! Error types for the batch pacer.

use thiserror::Error;

use crate::sink::PartitionId;

/// Errors that end a pacer run.
#[derive(Error, Debug)]
pub enum PacerError {
    #[error("Invalid pacer configuration for '{label}': {reason}")]
    InvalidConfig { label: String, reason: String },

    /// The sink failed while creating, filling or sending a batch.
    /// Batches sent before this one stay sent; `remaining` messages were never delivered.
    #[error("Sink error in '{label}' on batch {batch} ({remaining} messages unsent): {source:#}")]
    Sink {
        label: String,
        batch: u64,
        remaining: usize,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to close sink for '{label}': {source:#}")]
    Close {
        label: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Pacer task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl PacerError {
    /// Label of the pacer that produced this error, if known.
    pub fn label(&self) -> Option<&str> {
        match self {
            PacerError::InvalidConfig { label, .. }
            | PacerError::Sink { label, .. }
            | PacerError::Close { label, .. } => Some(label),
            PacerError::Join(_) => None,
        }
    }
}

/// Returned by [`EventBatch::try_add`](crate::EventBatch::try_add) when a payload
/// would push the batch over its size limit.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "Payload of {payload_bytes} bytes does not fit into batch for partition {partition} \
     ({size_in_bytes} of {max_size_in_bytes} bytes used)"
)]
pub struct BatchFull {
    pub partition: PartitionId,
    pub payload_bytes: usize,
    pub size_in_bytes: usize,
    pub max_size_in_bytes: usize,
}
