use sluice_types::{Cursor, EventTypeName, SubscriptionId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Subscription not found: {0}")]
    SubscriptionNotFound(SubscriptionId),

    #[error("Event type not found: {0}")]
    EventTypeNotFound(EventTypeName),

    #[error("Stream response carried no stream id")]
    StreamIdMissing,

    #[error("Failed to decode batch: {source} (raw: {})", String::from_utf8_lossy(.raw))]
    DeserializationFailure {
        raw: Vec<u8>,
        #[source]
        source: serde_json::Error,
    },

    #[error("Cursor already committed: partition {} offset {}", .0.partition, .0.offset)]
    CursorAlreadyCommitted(Cursor),

    #[error("Commit rejected: {0}")]
    CommitRejected(String),

    #[error("No cursor distance result: {0}")]
    CursorDistanceNoResult(String),

    #[error("Partition {partition} has {available} events past the cursor, {requested} requested")]
    InsufficientRange {
        partition: String,
        requested: u64,
        available: i64,
    },

    #[error("Unknown partition {partition} for event type {event_type}")]
    UnknownPartition {
        event_type: EventTypeName,
        partition: String,
    },

    /// Error raised by the caller's processing stage, passed through as is
    #[error(transparent)]
    Processing(anyhow::Error),

    #[error("Committer stopped before the stream ended")]
    CommitterStopped,

    #[error("Unexpected response ({status}): {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
