//! The rate-limited batch loop.
//!
//! A pacer owns one [`MessagePool`] and drains it into a sink: sleep for the
//! interval, sample a batch, send it, drop the sent messages, repeat. The
//! sleep comes before every send, the first and the last included.

use rand::Rng;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::error::PacerError;
use crate::message::{Message, MessageId, MessagePool};
use crate::sink::{EventSink, PartitionId};

/// Default number of messages per batch.
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Default delay before each batch.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(6);

/// Per-pacer settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacerConfig {
    /// Upper bound on messages per batch
    pub batch_size: usize,
    /// Delay before every batch
    pub interval: Duration,
    /// Free-text name used in log lines and errors
    pub label: String,
}

impl PacerConfig {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            interval: DEFAULT_INTERVAL,
            label: label.into(),
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn validate(&self) -> Result<(), PacerError> {
        if self.batch_size == 0 {
            return Err(self.invalid("batch size must be positive"));
        }
        if self.interval.is_zero() {
            return Err(self.invalid("interval must be positive"));
        }
        Ok(())
    }

    fn invalid(&self, reason: &str) -> PacerError {
        PacerError::InvalidConfig {
            label: self.label.clone(),
            reason: reason.to_string(),
        }
    }
}

/// Metrics from a completed pacer run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PacerMetrics {
    pub label: String,
    pub partition: PartitionId,
    /// Number of batches delivered.
    pub batches_sent: u64,
    /// Number of messages delivered.
    pub messages_sent: u64,
    /// Wall time of the run, pacing delays included.
    pub total_duration: Duration,
}

impl PacerMetrics {
    /// Calculate messages per second.
    pub fn messages_per_second(&self) -> f64 {
        if self.total_duration.as_secs_f64() > 0.0 {
            self.messages_sent as f64 / self.total_duration.as_secs_f64()
        } else {
            0.0
        }
    }
}

/// Drains a message pool into a sink at a fixed pace.
pub struct Pacer<S, R> {
    pool: MessagePool,
    partition: PartitionId,
    config: PacerConfig,
    sink: S,
    rng: R,
}

impl<S, R> Pacer<S, R>
where
    S: EventSink,
    R: Rng,
{
    /// Create a pacer.
    ///
    /// # Arguments
    ///
    /// * `pool` - Messages to send; consumed by the run
    /// * `partition` - Partition every batch is addressed to
    /// * `config` - Batch size, interval and label
    /// * `sink` - Destination for the batches
    /// * `rng` - Sampler used to pick batch members
    pub fn new(
        pool: MessagePool,
        partition: PartitionId,
        config: PacerConfig,
        sink: S,
        rng: R,
    ) -> Self {
        Self {
            pool,
            partition,
            config,
            sink,
            rng,
        }
    }

    pub fn label(&self) -> &str {
        &self.config.label
    }

    pub fn remaining(&self) -> usize {
        self.pool.len()
    }

    /// Send every message of the pool, then close the sink.
    ///
    /// The first sink error stops the loop. Messages sent before it stay sent
    /// and the rest of the pool is dropped.
    pub async fn run(mut self) -> Result<PacerMetrics, PacerError> {
        self.config.validate()?;

        let start = Instant::now();
        let mut metrics = PacerMetrics {
            label: self.config.label.clone(),
            partition: self.partition,
            ..Default::default()
        };

        let outcome = self.drain(&mut metrics).await;
        let closed = self.sink.close().await;
        metrics.total_duration = start.elapsed();

        match (outcome, closed) {
            (Ok(()), Ok(())) => {
                info!(
                    "Finished {}: {} messages in {} batches ({:?})",
                    metrics.label, metrics.messages_sent, metrics.batches_sent, metrics.total_duration
                );
                Ok(metrics)
            }
            (Ok(()), Err(source)) => Err(PacerError::Close {
                label: metrics.label,
                source,
            }),
            (Err(err), Err(close_err)) => {
                warn!(
                    "Failed to close sink for {} after error: {close_err:#}",
                    metrics.label
                );
                Err(err)
            }
            (Err(err), Ok(())) => Err(err),
        }
    }

    async fn drain(&mut self, metrics: &mut PacerMetrics) -> Result<(), PacerError> {
        let batch_size = self.config.batch_size;

        while !self.pool.is_empty() {
            tokio::time::sleep(self.config.interval).await;

            let remaining = self.pool.len();
            if remaining >= batch_size {
                info!(
                    "sending {} messages from {} to partition {}",
                    batch_size, self.config.label, self.partition
                );
            } else {
                info!(
                    "sending last {} messages from {} to partition {}",
                    remaining, self.config.label, self.partition
                );
            }
            let selected = self.pool.sample(batch_size, &mut self.rng);

            let batch_number = metrics.batches_sent + 1;
            if let Err(source) = deliver(&self.sink, self.partition, &selected).await {
                return Err(PacerError::Sink {
                    label: self.config.label.clone(),
                    batch: batch_number,
                    remaining,
                    source,
                });
            }

            let ids: Vec<MessageId> = selected.iter().map(Message::id).collect();
            self.pool.remove(&ids);

            metrics.batches_sent = batch_number;
            metrics.messages_sent += selected.len() as u64;

            debug!(
                "Batch {} of {} delivered: {} messages, {} remaining",
                batch_number,
                self.config.label,
                selected.len(),
                self.pool.len()
            );
        }

        Ok(())
    }
}

/// Build one batch from `selected` and send it once.
async fn deliver<S: EventSink>(
    sink: &S,
    partition: PartitionId,
    selected: &[Message],
) -> anyhow::Result<()> {
    let mut batch = sink.create_batch(partition).await?;
    for message in selected {
        batch.try_add(message.serialize())?;
    }
    sink.send_batch(batch).await
}
