//! Sink trait definition.
//!
//! A sink is an event-streaming destination that accepts batches addressed
//! to one partition. The pacer only relies on the calls below, never on the
//! transport or wire format behind them.

use anyhow::Result;
use std::fmt;
use std::sync::Arc;

use crate::error::BatchFull;

/// Largest batch accepted by default (the Event Hubs batch limit).
pub const DEFAULT_MAX_BATCH_BYTES: usize = 1024 * 1024;

/// Partition of the destination log a batch is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PartitionId(i32);

impl PartitionId {
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl From<i32> for PartitionId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl fmt::Display for PartitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outbound batch scoped to a single partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventBatch {
    partition: PartitionId,
    payloads: Vec<String>,
    size_in_bytes: usize,
    max_size_in_bytes: usize,
}

impl EventBatch {
    pub fn new(partition: PartitionId) -> Self {
        Self::with_max_size(partition, DEFAULT_MAX_BATCH_BYTES)
    }

    pub fn with_max_size(partition: PartitionId, max_size_in_bytes: usize) -> Self {
        Self {
            partition,
            payloads: Vec::new(),
            size_in_bytes: 0,
            max_size_in_bytes,
        }
    }

    /// Append a serialized event, refusing it if the batch would exceed its limit.
    pub fn try_add(&mut self, payload: impl Into<String>) -> std::result::Result<(), BatchFull> {
        let payload = payload.into();
        if self.size_in_bytes + payload.len() > self.max_size_in_bytes {
            return Err(BatchFull {
                partition: self.partition,
                payload_bytes: payload.len(),
                size_in_bytes: self.size_in_bytes,
                max_size_in_bytes: self.max_size_in_bytes,
            });
        }

        self.size_in_bytes += payload.len();
        self.payloads.push(payload);
        Ok(())
    }

    pub fn partition(&self) -> PartitionId {
        self.partition
    }

    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }

    pub fn size_in_bytes(&self) -> usize {
        self.size_in_bytes
    }

    pub fn max_size_in_bytes(&self) -> usize {
        self.max_size_in_bytes
    }

    pub fn payloads(&self) -> &[String] {
        &self.payloads
    }

    pub fn into_payloads(self) -> Vec<String> {
        self.payloads
    }
}

/// Destination that accepts partition-scoped batches.
///
/// Pacers are generic over the sink, so the binary picks the implementation
/// once and everything below is statically dispatched:
///
/// ```ignore
/// async fn deliver<S: EventSink>(sink: &S, payloads: &[String]) -> Result<()> {
///     let mut batch = sink.create_batch(PartitionId::default()).await?;
///     for payload in payloads {
///         batch.try_add(payload.as_str())?;
///     }
///     sink.send_batch(batch).await
/// }
/// ```
#[async_trait::async_trait]
pub trait EventSink: Send + Sync {
    /// Create an empty batch addressed to `partition`.
    async fn create_batch(&self, partition: PartitionId) -> Result<EventBatch>;

    /// Deliver every event of the batch. Called once per batch.
    async fn send_batch(&self, batch: EventBatch) -> Result<()>;

    /// Release the connection. Called once when the pacer stops.
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

#[async_trait::async_trait]
impl<S: EventSink + ?Sized> EventSink for Arc<S> {
    async fn create_batch(&self, partition: PartitionId) -> Result<EventBatch> {
        (**self).create_batch(partition).await
    }

    async fn send_batch(&self, batch: EventBatch) -> Result<()> {
        (**self).send_batch(batch).await
    }

    async fn close(&self) -> Result<()> {
        (**self).close().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_default_is_zero() {
        assert_eq!(PartitionId::default().get(), 0);
        assert_eq!(PartitionId::from(3).to_string(), "3");
    }

    #[test]
    fn test_try_add_tracks_size() {
        let mut batch = EventBatch::new(PartitionId::new(1));
        batch.try_add("{\"a\":1}").unwrap();
        batch.try_add(String::from("{}")).unwrap();

        assert_eq!(batch.len(), 2);
        assert_eq!(batch.size_in_bytes(), 9);
        assert_eq!(batch.partition(), PartitionId::new(1));
    }

    #[test]
    fn test_try_add_refuses_oversized_payload() {
        let mut batch = EventBatch::with_max_size(PartitionId::default(), 10);
        batch.try_add("12345678").unwrap();

        let err = batch.try_add("123").unwrap_err();
        assert_eq!(err.payload_bytes, 3);
        assert_eq!(err.size_in_bytes, 8);
        assert_eq!(batch.len(), 1);
    }
}
