use serde::{Deserialize, Serialize};
use sluice_client::{Error, Result};
use sluice_types::CommitBufferingStrategy;

/// Commit discipline of one consumption call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "buffering", rename_all = "lowercase")]
pub enum CommitStrategy {
    /// Commit each cursor inline before reading the next batch
    Sync,
    /// Queue cursors for a background committer
    Async(CommitBufferingStrategy),
}

impl Default for CommitStrategy {
    fn default() -> Self {
        CommitStrategy::Sync
    }
}

impl CommitStrategy {
    pub fn async_no_buffer() -> Self {
        CommitStrategy::Async(CommitBufferingStrategy::NoBuffer)
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            CommitStrategy::Sync => Ok(()),
            CommitStrategy::Async(buffering) => buffering.validate().map_err(Error::InvalidConfig),
        }
    }
}
