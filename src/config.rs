//! Command-line configuration of the sender.

mod duration;

pub use duration::parse_duration;

use anyhow::{bail, Context};
use batch_pacer::{PartitionId, DEFAULT_BATCH_SIZE};
use clap::Parser;
use eventhub_kafka_sink::{SinkConfig, DEFAULT_MESSAGE_TIMEOUT_MS};
use rand::rngs::StdRng;
use rand::SeedableRng;
use row_reshaper::DEFAULT_BODY_COLUMN;
use std::path::PathBuf;
use std::time::Duration;

/// Everything a run needs, passed explicitly into [`run`](crate::run).
#[derive(Parser, Clone)]
pub struct SenderOpts {
    /// CSV file whose body column holds one JSON object per row
    #[arg(long, default_value = "data.csv", env = "SENDER_DF_PATH")]
    pub df_path: PathBuf,

    /// Event Hubs connection string (namespace or hub level)
    #[arg(
        long,
        default_value = "",
        env = "EVENTHUB_CONNECTION_STRING",
        hide_env_values = true
    )]
    pub connection_string: String,

    /// Event hub receiving the events (defaults to the connection string's EntityPath)
    #[arg(long, default_value = "", env = "EVENTHUB_NAME")]
    pub eventhub_name: String,

    /// Event Hubs namespace (defaults to the connection string's Endpoint)
    #[arg(long, default_value = "", env = "EVENTHUB_NAMESPACE")]
    pub namespace: String,

    /// Plain Kafka brokers to use instead of Event Hubs (comma-separated)
    #[arg(long, env = "KAFKA_BROKERS")]
    pub brokers: Option<String>,

    /// Partition every batch is sent to
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub partition: i32,

    /// Maximum number of events per batch
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Delay before each batch of the base events (e.g. "6", "6s", "500ms")
    #[arg(long, default_value = "6s", value_parser = parse_duration)]
    pub base_interval: Duration,

    /// Delay before each batch of the augmented events
    #[arg(long, default_value = "8s", value_parser = parse_duration)]
    pub augmented_interval: Duration,

    /// Name of the CSV column holding the JSON body
    #[arg(long, default_value = DEFAULT_BODY_COLUMN)]
    pub body_column: String,

    /// Producer delivery timeout in milliseconds
    #[arg(long, default_value_t = DEFAULT_MESSAGE_TIMEOUT_MS)]
    pub message_timeout_ms: u64,

    /// Random seed for reproducible letters and batches (default: OS entropy)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Dry run mode - log batches instead of sending them
    #[arg(long)]
    pub dry_run: bool,
}

impl SenderOpts {
    /// Reject settings that can never work, before any file or network access.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.batch_size == 0 {
            bail!("--batch-size must be positive");
        }
        if self.base_interval.is_zero() || self.augmented_interval.is_zero() {
            bail!("--base-interval and --augmented-interval must be positive");
        }
        if self.partition < 0 {
            bail!("--partition must not be negative, got {}", self.partition);
        }
        if self.dry_run {
            return Ok(());
        }

        match &self.brokers {
            Some(brokers) if !brokers.trim().is_empty() => {
                if self.eventhub_name.trim().is_empty() {
                    bail!("--eventhub-name is required as topic when --brokers is set");
                }
            }
            _ => {
                if self.connection_string.trim().is_empty() {
                    bail!("--connection-string is required unless --brokers or --dry-run is set");
                }
            }
        }
        Ok(())
    }

    pub fn partition_id(&self) -> PartitionId {
        PartitionId::new(self.partition)
    }

    /// Producer settings, plain Kafka when `--brokers` is given and Event Hubs otherwise.
    pub fn sink_config(&self) -> anyhow::Result<SinkConfig> {
        let config = match &self.brokers {
            Some(brokers) if !brokers.trim().is_empty() => {
                SinkConfig::plaintext(brokers, &self.eventhub_name)
            }
            _ => SinkConfig::from_event_hubs(
                &self.connection_string,
                Some(self.eventhub_name.as_str()),
                Some(self.namespace.as_str()),
            ),
        }
        .context("Failed to build producer configuration")?;

        Ok(config.with_message_timeout_ms(self.message_timeout_ms))
    }

    pub fn reshape_config(&self) -> row_reshaper::Config {
        row_reshaper::Config {
            body_column: self.body_column.clone(),
            ..Default::default()
        }
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventhub_kafka_sink::Security;

    const CONN: &str =
        "Endpoint=sb://my-ns.servicebus.windows.net/;SharedAccessKeyName=send;SharedAccessKey=k";

    fn opts(args: &[&str]) -> SenderOpts {
        SenderOpts::parse_from(std::iter::once("eventhub-sender").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults() {
        let opts = opts(&["--dry-run"]);
        assert_eq!(opts.batch_size, 10);
        assert_eq!(opts.base_interval, Duration::from_secs(6));
        assert_eq!(opts.augmented_interval, Duration::from_secs(8));
        assert_eq!(opts.partition_id(), PartitionId::default());
        assert_eq!(opts.body_column, "body");
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_interval_flags_accept_units() {
        let opts = opts(&["--dry-run", "--base-interval", "500ms", "--augmented-interval", "2"]);
        assert_eq!(opts.base_interval, Duration::from_millis(500));
        assert_eq!(opts.augmented_interval, Duration::from_secs(2));
    }

    #[test]
    fn test_validate_requires_destination() {
        let err = opts(&[]).validate().unwrap_err();
        assert!(err.to_string().contains("--connection-string"));

        let err = opts(&["--brokers", "localhost:9092"]).validate().unwrap_err();
        assert!(err.to_string().contains("--eventhub-name"));
    }

    #[test]
    fn test_validate_rejects_bad_numbers() {
        assert!(opts(&["--dry-run", "--batch-size", "0"]).validate().is_err());
        assert!(opts(&["--dry-run", "--partition", "-1"]).validate().is_err());
        assert!(opts(&["--dry-run", "--base-interval", "0"])
            .validate()
            .is_err());
    }

    #[test]
    fn test_sink_config_event_hubs() {
        let opts = opts(&[
            "--connection-string",
            CONN,
            "--eventhub-name",
            "listings",
            "--message-timeout-ms",
            "5000",
        ]);
        opts.validate().unwrap();

        let config = opts.sink_config().unwrap();
        assert_eq!(config.bootstrap_servers, "my-ns.servicebus.windows.net:9093");
        assert_eq!(config.topic, "listings");
        assert_eq!(config.message_timeout_ms, 5000);
        assert!(matches!(config.security, Security::SaslSsl { .. }));
    }

    #[test]
    fn test_sink_config_plain_brokers() {
        let opts = opts(&["--brokers", "localhost:9092", "--eventhub-name", "events"]);
        opts.validate().unwrap();

        let config = opts.sink_config().unwrap();
        assert_eq!(config.bootstrap_servers, "localhost:9092");
        assert_eq!(config.security, Security::Plaintext);
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        use rand::Rng;

        let opts = opts(&["--dry-run", "--seed", "42"]);
        let a: u64 = opts.rng().random();
        let b: u64 = opts.rng().random();
        assert_eq!(a, b);
    }
}
