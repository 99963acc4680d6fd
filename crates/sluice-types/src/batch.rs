use crate::cursor::{Cursor, HasCursor};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One line of a subscription stream: a cursor plus the events it covers.
///
/// Keep-alive lines carry a cursor and no events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventStreamBatch<T> {
    pub cursor: Cursor,
    #[serde(default = "Vec::new", skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<serde_json::Value>,
}

impl<T> EventStreamBatch<T> {
    pub fn new(cursor: Cursor, events: Vec<T>) -> Self {
        Self {
            cursor,
            events,
            info: None,
        }
    }

    pub fn is_keep_alive(&self) -> bool {
        self.events.is_empty()
    }
}

impl<T> HasCursor for EventStreamBatch<T> {
    fn cursor(&self) -> &Cursor {
        &self.cursor
    }
}

/// Standard metadata block of a published event.
///
/// Typed payloads embed this as their `metadata` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMetadata {
    pub eid: Uuid,
    pub occurred_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_id: Option<String>,
}

impl EventMetadata {
    pub fn new() -> Self {
        Self {
            eid: Uuid::new_v4(),
            occurred_at: Utc::now(),
            event_type: None,
            partition: None,
            received_at: None,
            flow_id: None,
        }
    }
}

impl Default for EventMetadata {
    fn default() -> Self {
        Self::new()
    }
}
