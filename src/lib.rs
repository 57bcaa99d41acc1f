//! eventhub-sender library
//!
//! Loads a CSV file whose `body` column holds one JSON object per row,
//! derives two event collections from it and streams both into Azure Event
//! Hubs as rate-limited batches, one independent pacer per collection.
//!
//! - `original df`: every row plus `join_col`
//! - `additional df`: every row plus `join_col` and a random `additional_col`,
//!   reduced to `listing_id`, `date`, `additional_col` and `join_col`
//!
//! # CLI Usage
//!
//! ```bash
//! # Send to Event Hubs
//! eventhub-sender \
//!   --df-path listings.csv \
//!   --connection-string "Endpoint=sb://my-ns.servicebus.windows.net/;SharedAccessKeyName=send;SharedAccessKey=..." \
//!   --eventhub-name listings
//!
//! # Send to a local Kafka broker every second
//! eventhub-sender --df-path listings.csv --brokers localhost:9092 --eventhub-name listings \
//!   --base-interval 1s --augmented-interval 1s
//!
//! # Only log what would be sent
//! eventhub-sender --df-path listings.csv --dry-run --seed 42
//! ```

use anyhow::Context;
use batch_pacer::{MessagePool, Orchestrator, Pacer, PacerConfig, PacerMetrics};
use eventhub_kafka_sink::KafkaEventSink;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;
use tracing::{info, warn};

pub mod config;
pub mod dry_run;

pub use config::SenderOpts;
pub use dry_run::DryRunSink;

/// Label of the pacer sending the base variant.
pub const ORIGINAL_LABEL: &str = "original df";

/// Label of the pacer sending the augmented variant.
pub const ADDITIONAL_LABEL: &str = "additional df";

/// Reshape the input file and send both collections to completion.
///
/// Returns the metrics of every pacer, or the first pacer error once all
/// pacers have stopped.
pub async fn run(opts: SenderOpts) -> anyhow::Result<Vec<PacerMetrics>> {
    opts.validate()?;

    let sink_config = if opts.dry_run {
        warn!("Running in dry-run mode - no events will be sent");
        None
    } else {
        Some(opts.sink_config()?)
    };

    let mut rng = opts.rng();
    let variants = row_reshaper::load_variants(&opts.df_path, &opts.reshape_config(), &mut rng)
        .with_context(|| format!("Failed to load events from {:?}", opts.df_path))?;

    info!(
        "Loaded {} base and {} augmented events",
        variants.base.len(),
        variants.augmented.len()
    );

    let streams: [(&str, _, Duration); 2] = [
        (ORIGINAL_LABEL, variants.base, opts.base_interval),
        (ADDITIONAL_LABEL, variants.augmented, opts.augmented_interval),
    ];

    let mut orchestrator = Orchestrator::new();
    for (label, bodies, interval) in streams {
        let pool = MessagePool::from_bodies(bodies);
        let config = PacerConfig::new(label)
            .with_batch_size(opts.batch_size)
            .with_interval(interval);
        let pacer_rng = StdRng::from_rng(&mut rng);

        match &sink_config {
            Some(sink_config) => {
                let sink = KafkaEventSink::new(sink_config.clone())
                    .with_context(|| format!("Failed to create producer for {label}"))?;
                orchestrator.spawn(Pacer::new(
                    pool,
                    opts.partition_id(),
                    config,
                    sink,
                    pacer_rng,
                ));
            }
            None => {
                orchestrator.spawn(Pacer::new(
                    pool,
                    opts.partition_id(),
                    config,
                    DryRunSink::new(label),
                    pacer_rng,
                ));
            }
        }
    }

    let metrics = orchestrator.join_all().await?;

    for m in &metrics {
        info!(
            "{}: {} events in {} batches to partition {} ({:.2} events/sec)",
            m.label,
            m.messages_sent,
            m.batches_sent,
            m.partition,
            m.messages_per_second()
        );
    }

    Ok(metrics)
}
