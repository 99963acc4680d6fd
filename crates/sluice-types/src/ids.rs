use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a server-managed subscription
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionId(pub String);

impl SubscriptionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SubscriptionId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Identifier minted by the server for one streaming connection.
///
/// Commits must carry the stream id of the connection that delivered the
/// cursors being committed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StreamId(pub String);

impl StreamId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Name of an event type (the log a set of partitions belongs to)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventTypeName(pub String);

impl EventTypeName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventTypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventTypeName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One open streaming connection of a subscription
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionEventStream {
    pub subscription_id: SubscriptionId,
    pub stream_id: StreamId,
}

impl SubscriptionEventStream {
    pub fn new(subscription_id: SubscriptionId, stream_id: StreamId) -> Self {
        Self {
            subscription_id,
            stream_id,
        }
    }
}
