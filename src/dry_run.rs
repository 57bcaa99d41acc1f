//! Sink used by `--dry-run`: logs batches instead of sending them.

use anyhow::Result;
use async_trait::async_trait;
use batch_pacer::{EventBatch, EventSink, PartitionId};
use tracing::{debug, info};

pub struct DryRunSink {
    label: String,
}

impl DryRunSink {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

#[async_trait]
impl EventSink for DryRunSink {
    async fn create_batch(&self, partition: PartitionId) -> Result<EventBatch> {
        Ok(EventBatch::new(partition))
    }

    async fn send_batch(&self, batch: EventBatch) -> Result<()> {
        info!(
            "Dry run: would send {} events ({} bytes) from {} to partition {}",
            batch.len(),
            batch.size_in_bytes(),
            self.label,
            batch.partition()
        );
        for payload in batch.payloads() {
            debug!("Dry run event: {payload}");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_batch_accepts_any_partition() {
        let sink = DryRunSink::new("original df");
        let mut batch = sink.create_batch(PartitionId::new(3)).await.unwrap();
        assert_eq!(batch.partition(), PartitionId::new(3));
        batch.try_add("{\"join_col\":0}").unwrap();
        batch.try_add("{\"join_col\":1}").unwrap();

        sink.send_batch(batch).await.unwrap();
        sink.close().await.unwrap();
    }
}
