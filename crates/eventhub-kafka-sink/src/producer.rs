//! `rdkafka`-backed implementation of [`EventSink`].

use anyhow::{Context, Result};
use async_trait::async_trait;
use batch_pacer::{EventBatch, EventSink, PartitionId};
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::util::Timeout;
use std::time::Duration;
use tracing::{debug, trace};

use crate::config::SinkConfig;
use crate::error::SinkError;

/// Sends batches to one topic through a `FutureProducer`.
///
/// Each pacer gets its own sink, so each pacer owns one producer connection.
pub struct KafkaEventSink {
    producer: FutureProducer,
    config: SinkConfig,
}

impl KafkaEventSink {
    /// Create the producer. No connection is made until the first send.
    pub fn new(config: SinkConfig) -> Result<Self, SinkError> {
        let producer: FutureProducer = config.client_config().create()?;

        debug!(
            "Created producer for topic '{}' at {}",
            config.topic, config.bootstrap_servers
        );

        Ok(Self { producer, config })
    }

    fn flush_timeout(&self) -> Duration {
        Duration::from_millis(self.config.message_timeout_ms)
    }
}

#[async_trait]
impl EventSink for KafkaEventSink {
    async fn create_batch(&self, partition: PartitionId) -> Result<EventBatch> {
        Ok(EventBatch::with_max_size(
            partition,
            self.config.max_batch_bytes,
        ))
    }

    async fn send_batch(&self, batch: EventBatch) -> Result<()> {
        let topic = self.config.topic.as_str();
        let partition = batch.partition();

        // send_result enqueues immediately; the futures only carry delivery reports.
        let mut deliveries = Vec::with_capacity(batch.len());
        for payload in batch.payloads() {
            let record = FutureRecord::<(), str>::to(topic)
                .partition(partition.get())
                .payload(payload.as_str());
            let delivery = self
                .producer
                .send_result(record)
                .map_err(|(err, _)| err)
                .with_context(|| format!("Failed to enqueue event for {topic}/{partition}"))?;
            deliveries.push(delivery);
        }

        for delivery in deliveries {
            delivery
                .await
                .with_context(|| format!("Delivery report for {topic}/{partition} was dropped"))?
                .map_err(|(err, _)| err)
                .with_context(|| format!("Failed to deliver event to {topic}/{partition}"))?;
        }

        trace!(
            "Delivered {} events ({} bytes) to {topic}/{partition}",
            batch.len(),
            batch.size_in_bytes()
        );
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        trace!("Flushing kafka producer");

        self.producer
            .flush(Timeout::After(self.flush_timeout()))
            .context("Failed to flush kafka producer")?;

        trace!("Done flushing kafka producer");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdkafka::consumer::{BaseConsumer, Consumer};
    use rdkafka::mocking::MockCluster;
    use rdkafka::{ClientConfig, Message, Offset, TopicPartitionList};
    use std::time::Instant;

    fn collect_payloads(bootstrap_servers: &str, topic: &str, expected: usize) -> Vec<String> {
        let consumer: BaseConsumer = ClientConfig::new()
            .set("bootstrap.servers", bootstrap_servers)
            .set("group.id", "eventhub-sender-test")
            .set("enable.auto.commit", "false")
            .create()
            .unwrap();

        let mut tpl = TopicPartitionList::new();
        tpl.add_partition_offset(topic, 0, Offset::Beginning)
            .unwrap();
        consumer.assign(&tpl).unwrap();

        let deadline = Instant::now() + Duration::from_secs(10);
        let mut payloads = Vec::new();
        while payloads.len() < expected && Instant::now() < deadline {
            if let Some(message) = consumer.poll(Duration::from_millis(100)) {
                let message = message.unwrap();
                let payload = message.payload().unwrap();
                payloads.push(String::from_utf8(payload.to_vec()).unwrap());
            }
        }
        payloads
    }

    #[tokio::test]
    async fn test_create_batch_uses_configured_limit() {
        let config = SinkConfig::plaintext("localhost:9092", "events")
            .unwrap()
            .with_max_batch_bytes(64);
        let sink = KafkaEventSink::new(config).unwrap();

        let batch = sink.create_batch(PartitionId::new(2)).await.unwrap();
        assert_eq!(batch.partition(), PartitionId::new(2));
        assert_eq!(batch.max_size_in_bytes(), 64);
        assert!(batch.is_empty());
    }

    #[tokio::test]
    async fn test_close_without_sends() {
        let config = SinkConfig::plaintext("localhost:9092", "events").unwrap();
        let sink = KafkaEventSink::new(config).unwrap();

        sink.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_send_batch_delivers_every_payload_to_partition() {
        let cluster = MockCluster::new(1).unwrap();
        cluster.create_topic("listings", 1, 1).unwrap();
        let bootstrap_servers = cluster.bootstrap_servers();

        let config = SinkConfig::plaintext(&bootstrap_servers, "listings")
            .unwrap()
            .with_message_timeout_ms(5_000);
        let sink = KafkaEventSink::new(config).unwrap();

        let payloads = [
            r#"{"listing_id":1,"join_col":0}"#,
            r#"{"listing_id":2,"join_col":1}"#,
            r#"{"listing_id":3,"join_col":2}"#,
        ];
        let mut batch = sink.create_batch(PartitionId::default()).await.unwrap();
        for payload in payloads {
            batch.try_add(payload).unwrap();
        }

        sink.send_batch(batch).await.unwrap();
        sink.close().await.unwrap();

        let received = collect_payloads(&bootstrap_servers, "listings", payloads.len());
        assert_eq!(received, payloads);
    }

    #[tokio::test]
    async fn test_send_batch_to_unknown_partition_fails() {
        let cluster = MockCluster::new(1).unwrap();
        cluster.create_topic("listings", 1, 1).unwrap();

        let config = SinkConfig::plaintext(&cluster.bootstrap_servers(), "listings")
            .unwrap()
            .with_message_timeout_ms(2_000);
        let sink = KafkaEventSink::new(config).unwrap();

        let mut batch = sink.create_batch(PartitionId::new(7)).await.unwrap();
        batch.try_add(r#"{"listing_id":1}"#).unwrap();

        let err = sink.send_batch(batch).await.unwrap_err();
        assert!(format!("{err:#}").contains("listings/7"));
    }
}
