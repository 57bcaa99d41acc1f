//! Messages and the pool a pacer drains.

use rand::seq::index;
use rand::Rng;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;

/// Synthetic identity assigned when a pool is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(u64);

impl MessageId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A JSON event waiting to be sent.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    id: MessageId,
    body: Value,
}

impl Message {
    pub fn id(&self) -> MessageId {
        self.id
    }

    /// Compact JSON text handed to the sink.
    pub fn serialize(&self) -> String {
        self.body.to_string()
    }
}

/// Exclusive, shrinking collection of messages owned by one pacer.
#[derive(Debug, Clone, Default)]
pub struct MessagePool {
    messages: Vec<Message>,
}

impl MessagePool {
    /// Build a pool, numbering the bodies in iteration order.
    pub fn from_bodies(bodies: impl IntoIterator<Item = Value>) -> Self {
        let messages = bodies
            .into_iter()
            .enumerate()
            .map(|(i, body)| Message {
                id: MessageId(i as u64),
                body,
            })
            .collect();
        Self { messages }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    /// Pick `amount` messages uniformly at random without replacement.
    ///
    /// When `amount` covers the whole pool every message is returned, in pool order.
    pub fn sample<R: Rng + ?Sized>(&self, amount: usize, rng: &mut R) -> Vec<Message> {
        if amount >= self.messages.len() {
            return self.messages.clone();
        }

        index::sample(rng, self.messages.len(), amount)
            .into_iter()
            .map(|i| self.messages[i].clone())
            .collect()
    }

    /// Remove messages by identity. Returns how many were removed.
    pub fn remove(&mut self, ids: &[MessageId]) -> usize {
        let ids: HashSet<MessageId> = ids.iter().copied().collect();
        let before = self.messages.len();
        self.messages.retain(|m| !ids.contains(&m.id));
        before - self.messages.len()
    }
}

impl FromIterator<Value> for MessagePool {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::from_bodies(iter)
    }
}
