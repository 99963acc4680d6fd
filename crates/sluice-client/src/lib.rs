pub mod error;
pub mod config;
pub mod traits;
pub mod buffer_utils;
pub mod client;

pub use error::{Error, Result};
pub use config::ClientConfig;
pub use traits::{ByteStream, EventLogClient, EventStream, PartitionApi, SubscriptionApi};
pub use buffer_utils::{decode_batches, decode_line, BatchStream, LineBuffer};
pub use client::{SluiceClient, STREAM_ID_HEADER};

pub use sluice_types as types;
