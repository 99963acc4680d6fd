use crate::error::Result;
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use sluice_types::{
    Cursor, CursorCommitResult, CursorDistanceQuery, CursorDistanceResult, EventTypeName,
    Partition, ShiftedCursor, StreamId, StreamParameters, SubscriptionEventStream, SubscriptionId,
};
use std::pin::Pin;

/// Raw body of a streaming response
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// An open subscription stream.
///
/// Owns the underlying connection; dropping it closes the transport.
pub struct EventStream {
    pub stream: SubscriptionEventStream,
    pub body: ByteStream,
}

impl EventStream {
    pub fn new(stream: SubscriptionEventStream, body: ByteStream) -> Self {
        Self { stream, body }
    }

    pub fn stream_id(&self) -> &StreamId {
        &self.stream.stream_id
    }
}

/// Subscription streaming and cursor commits
#[async_trait]
pub trait SubscriptionApi: Send + Sync {
    /// Open the long-lived events stream of a subscription
    async fn open_stream(
        &self,
        subscription_id: &SubscriptionId,
        params: &StreamParameters,
    ) -> Result<EventStream>;

    /// Commit cursors on behalf of the stream that delivered them
    async fn commit_cursors(
        &self,
        subscription_id: &SubscriptionId,
        stream_id: &StreamId,
        cursors: Vec<Cursor>,
    ) -> Result<Vec<CursorCommitResult>>;
}

/// Read-only partition and offset lookups of an event type.
///
/// Offsets are opaque; every positional question about them goes through
/// these calls.
#[async_trait]
pub trait PartitionApi: Send + Sync {
    async fn partitions(&self, event_type: &EventTypeName) -> Result<Vec<Partition>>;

    async fn shift_cursors(
        &self,
        event_type: &EventTypeName,
        shifts: Vec<ShiftedCursor>,
    ) -> Result<Vec<Cursor>>;

    async fn cursor_distances(
        &self,
        event_type: &EventTypeName,
        queries: Vec<CursorDistanceQuery>,
    ) -> Result<Vec<CursorDistanceResult>>;
}

/// Convenience trait for clients that support both
pub trait EventLogClient: SubscriptionApi + PartitionApi {}
