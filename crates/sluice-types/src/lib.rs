pub mod ids;
pub mod cursor;
pub mod batch;
pub mod commit;
pub mod params;
pub mod partition;

pub use ids::{EventTypeName, StreamId, SubscriptionEventStream, SubscriptionId};
pub use cursor::{Cursor, CursorDistance, HasCursor};
pub use batch::{EventMetadata, EventStreamBatch};
pub use commit::{CommitBufferingStrategy, CommitResult, CursorCommitResult};
pub use params::StreamParameters;
pub use partition::{CursorDistanceQuery, CursorDistanceResult, Partition, ShiftedCursor};
