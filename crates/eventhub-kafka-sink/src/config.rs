//! Sink configuration and the librdkafka settings derived from it.

use batch_pacer::DEFAULT_MAX_BATCH_BYTES;
use rdkafka::ClientConfig;
use tracing::debug;

use crate::connection::ConnectionString;
use crate::error::SinkError;

/// Port of the Kafka endpoint of an Event Hubs namespace.
pub const EVENT_HUBS_KAFKA_PORT: u16 = 9093;

/// Default librdkafka `message.timeout.ms`.
pub const DEFAULT_MESSAGE_TIMEOUT_MS: u64 = 30_000;

const EVENT_HUBS_DOMAIN: &str = "servicebus.windows.net";

/// How the producer authenticates.
#[derive(Clone, PartialEq, Eq)]
pub enum Security {
    Plaintext,
    /// SASL PLAIN over TLS, as required by Event Hubs.
    SaslSsl { username: String, password: String },
}

impl std::fmt::Debug for Security {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Security::Plaintext => write!(f, "Plaintext"),
            Security::SaslSsl { username, .. } => f
                .debug_struct("SaslSsl")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
        }
    }
}

/// Where and how a [`KafkaEventSink`](crate::KafkaEventSink) sends events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkConfig {
    /// Comma-separated `host:port` list
    pub bootstrap_servers: String,
    /// Event hub (Kafka topic) receiving the events
    pub topic: String,
    pub security: Security,
    /// librdkafka `message.timeout.ms`
    pub message_timeout_ms: u64,
    /// Upper bound on the payload bytes of one batch
    pub max_batch_bytes: usize,
}

impl SinkConfig {
    /// Configuration for the Kafka endpoint of an Event Hubs namespace.
    ///
    /// # Arguments
    ///
    /// * `connection_string` - Namespace or hub connection string, used as SASL password
    /// * `eventhub_name` - Target hub; falls back to the string's `EntityPath`
    /// * `namespace` - Namespace name or host; falls back to the string's `Endpoint`
    pub fn from_event_hubs(
        connection_string: &str,
        eventhub_name: Option<&str>,
        namespace: Option<&str>,
    ) -> Result<Self, SinkError> {
        let conn = ConnectionString::parse(connection_string)?;

        let topic = non_empty(eventhub_name)
            .or(conn.entity_path())
            .ok_or_else(|| {
                SinkError::Config(
                    "no event hub name given and the connection string has no EntityPath"
                        .to_string(),
                )
            })?
            .to_string();

        let host = match non_empty(namespace) {
            Some(ns) if ns.contains('.') => ns.to_string(),
            Some(ns) => format!("{ns}.{EVENT_HUBS_DOMAIN}"),
            None => conn.host()?.to_string(),
        };

        debug!(
            "Event Hubs target {host}/{topic} using key '{}'",
            conn.shared_access_key_name().unwrap_or("<unnamed>")
        );

        Ok(Self {
            bootstrap_servers: format!("{host}:{EVENT_HUBS_KAFKA_PORT}"),
            topic,
            security: Security::SaslSsl {
                username: "$ConnectionString".to_string(),
                password: conn.as_str().to_string(),
            },
            message_timeout_ms: DEFAULT_MESSAGE_TIMEOUT_MS,
            max_batch_bytes: DEFAULT_MAX_BATCH_BYTES,
        })
    }

    /// Configuration for an unauthenticated Kafka broker.
    pub fn plaintext(brokers: &str, topic: &str) -> Result<Self, SinkError> {
        if brokers.trim().is_empty() {
            return Err(SinkError::Config("no brokers given".to_string()));
        }
        if topic.trim().is_empty() {
            return Err(SinkError::Config("no topic given".to_string()));
        }

        Ok(Self {
            bootstrap_servers: brokers.trim().to_string(),
            topic: topic.trim().to_string(),
            security: Security::Plaintext,
            message_timeout_ms: DEFAULT_MESSAGE_TIMEOUT_MS,
            max_batch_bytes: DEFAULT_MAX_BATCH_BYTES,
        })
    }

    pub fn with_message_timeout_ms(mut self, message_timeout_ms: u64) -> Self {
        self.message_timeout_ms = message_timeout_ms;
        self
    }

    pub fn with_max_batch_bytes(mut self, max_batch_bytes: usize) -> Self {
        self.max_batch_bytes = max_batch_bytes;
        self
    }

    /// librdkafka settings for a producer.
    pub fn client_config(&self) -> ClientConfig {
        let mut client = ClientConfig::new();
        client
            .set("bootstrap.servers", &self.bootstrap_servers)
            .set("message.timeout.ms", self.message_timeout_ms.to_string());

        if let Security::SaslSsl { username, password } = &self.security {
            client
                .set("security.protocol", "SASL_SSL")
                .set("sasl.mechanisms", "PLAIN")
                .set("sasl.username", username)
                .set("sasl.password", password);
        }

        client
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
