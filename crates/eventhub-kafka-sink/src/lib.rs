//! Event Hubs sink for eventhub-sender
//!
//! Azure Event Hubs exposes a Kafka-compatible endpoint on port 9093 of every
//! namespace. This crate implements [`batch_pacer::EventSink`] on top of an
//! `rdkafka` [`FutureProducer`](rdkafka::producer::FutureProducer) pointed at
//! that endpoint, authenticating with the namespace connection string over
//! SASL PLAIN. A plain Kafka broker can be targeted instead for local runs.
//!
//! ```rust,no_run
//! use eventhub_kafka_sink::{KafkaEventSink, SinkConfig};
//!
//! # fn main() -> Result<(), eventhub_kafka_sink::SinkError> {
//! let config = SinkConfig::from_event_hubs(
//!     "Endpoint=sb://my-ns.servicebus.windows.net/;SharedAccessKeyName=send;SharedAccessKey=secret",
//!     Some("listings"),
//!     None,
//! )?;
//! let sink = KafkaEventSink::new(config)?;
//! # Ok(())
//! # }
//! ```

mod config;
mod connection;
mod error;
mod producer;

pub use config::{Security, SinkConfig, DEFAULT_MESSAGE_TIMEOUT_MS, EVENT_HUBS_KAFKA_PORT};
pub use connection::ConnectionString;
pub use error::SinkError;
pub use producer::KafkaEventSink;
