//! Event Hubs connection strings.
//!
//! Format: `Endpoint=sb://<namespace>.servicebus.windows.net/;SharedAccessKeyName=<name>;SharedAccessKey=<key>[;EntityPath=<hub>]`.
//! Keys are matched case-insensitively and segments may appear in any order.

use std::fmt;

use crate::error::SinkError;

/// Parsed Event Hubs connection string.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionString {
    raw: String,
    endpoint: String,
    shared_access_key_name: Option<String>,
    shared_access_key: Option<String>,
    entity_path: Option<String>,
}

impl ConnectionString {
    pub fn parse(raw: &str) -> Result<Self, SinkError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(SinkError::ConnectionString("empty".to_string()));
        }

        let mut endpoint = None;
        let mut shared_access_key_name = None;
        let mut shared_access_key = None;
        let mut entity_path = None;

        for segment in raw.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            let (key, value) = segment.split_once('=').ok_or_else(|| {
                SinkError::ConnectionString(format!("segment without '=': {segment}"))
            })?;
            let value = value.trim().to_string();

            match key.trim().to_ascii_lowercase().as_str() {
                "endpoint" => endpoint = Some(value),
                "sharedaccesskeyname" => shared_access_key_name = Some(value),
                "sharedaccesskey" => shared_access_key = Some(value),
                "entitypath" => entity_path = Some(value),
                _ => {}
            }
        }

        let endpoint = endpoint
            .filter(|e| !e.is_empty())
            .ok_or_else(|| SinkError::ConnectionString("missing Endpoint".to_string()))?;

        Ok(Self {
            raw: raw.to_string(),
            endpoint,
            shared_access_key_name,
            shared_access_key,
            entity_path: entity_path.filter(|p| !p.is_empty()),
        })
    }

    /// The connection string as given, used as the SASL password.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn shared_access_key_name(&self) -> Option<&str> {
        self.shared_access_key_name.as_deref()
    }

    pub fn entity_path(&self) -> Option<&str> {
        self.entity_path.as_deref()
    }

    /// Host part of `Endpoint`, e.g. `my-ns.servicebus.windows.net`.
    pub fn host(&self) -> Result<&str, SinkError> {
        let without_scheme = self
            .endpoint
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(&self.endpoint);
        let host = without_scheme
            .split(['/', ':'])
            .next()
            .unwrap_or_default();

        if host.is_empty() {
            return Err(SinkError::ConnectionString(format!(
                "no host in Endpoint {}",
                self.endpoint
            )));
        }
        Ok(host)
    }
}

// The raw string and key carry the secret.
impl fmt::Debug for ConnectionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionString")
            .field("endpoint", &self.endpoint)
            .field("shared_access_key_name", &self.shared_access_key_name)
            .field(
                "shared_access_key",
                &self.shared_access_key.as_ref().map(|_| "<redacted>"),
            )
            .field("entity_path", &self.entity_path)
            .finish()
    }
}
