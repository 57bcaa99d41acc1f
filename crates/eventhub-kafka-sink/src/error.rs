//! Error types for the Event Hubs sink.

use thiserror::Error;

/// Errors raised while configuring or creating the sink.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Kafka error: {0}")]
    Kafka(#[from] rdkafka::error::KafkaError),

    #[error("Invalid connection string: {0}")]
    ConnectionString(String),

    #[error("Invalid sink configuration: {0}")]
    Config(String),
}
