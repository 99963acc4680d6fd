//! # Sluice - subscription consumer for partitioned event logs
//!
//! Sluice reads a server-managed subscription as a long-lived stream of
//! newline-delimited batches, hands every batch to your code and commits the
//! cursors you give back:
//! - **Streaming decode** of `{cursor, events}` lines, typed with serde
//! - **Synchronous commits**: commit each batch before reading the next
//! - **Asynchronous commits**: a background committer with a bounded queue,
//!   optionally coalescing cursors per partition over a time/count window
//! - **Cursor arithmetic**: shift cursors and measure distances, resolved by
//!   the server (offsets stay opaque)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sluice::prelude::*;
//! use serde_json::Value;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let sluice = SluiceBuilder::new()
//!         .base_url("https://events.example.org")
//!         .access_token("token")
//!         .build()?;
//!
//!     sluice
//!         .consume(
//!             &SubscriptionId::new("my-subscription"),
//!             &StreamParameters::new().batch_limit(100),
//!             CommitStrategy::async_no_buffer(),
//!             |batch: EventStreamBatch<Value>| async move {
//!                 println!("{} events", batch.events.len());
//!                 Ok(batch)
//!             },
//!         )
//!         .await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **sluice-types**: Data model (Cursor, EventStreamBatch, strategies)
//! - **sluice-client**: HTTP client, stream decoding and errors
//! - **sluice-consumer**: Consumption pipeline, committer, cursor arithmetic

// Re-export all public APIs
pub use sluice_client as client;
pub use sluice_consumer as consumer;
pub use sluice_types as types;

// Re-export commonly used types
pub use sluice_client::{ClientConfig, Error, Result, SluiceClient};
pub use sluice_consumer::{CommitStrategy, ConsumerConfig, CursorCalculator, SubscriptionConsumer};
pub use sluice_types::{
    CommitBufferingStrategy, Cursor, EventStreamBatch, EventTypeName, HasCursor,
    StreamParameters, SubscriptionId,
};

/// High-level builder and facade
pub mod builder;

pub use builder::{Sluice, SluiceBuilder};

/// Convenient prelude with commonly used types
pub mod prelude {
    pub use crate::builder::{Sluice, SluiceBuilder};
    pub use crate::types::{
        CommitBufferingStrategy, Cursor, EventMetadata, EventStreamBatch, EventTypeName,
        HasCursor, StreamParameters, SubscriptionId,
    };
    pub use crate::consumer::{CommitStrategy, ConsumerConfig};
    pub use crate::client::{ClientConfig, Error};
}
