use serde::{Deserialize, Serialize};
use sluice_client::{Error, Result};

pub const DEFAULT_COMMIT_QUEUE_CAPACITY: usize = 1024;

/// Largest buffer a tokio channel accepts
pub const MAX_COMMIT_QUEUE_CAPACITY: usize = tokio::sync::Semaphore::MAX_PERMITS;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsumerConfig {
    /// Slots in the queue between the stream reader and the committer
    #[serde(default = "default_commit_queue_capacity")]
    pub commit_queue_capacity: usize,
    /// Log and skip `outdated` commit results instead of failing
    #[serde(default)]
    pub tolerate_outdated_commits: bool,
}

fn default_commit_queue_capacity() -> usize {
    DEFAULT_COMMIT_QUEUE_CAPACITY
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            commit_queue_capacity: DEFAULT_COMMIT_QUEUE_CAPACITY,
            tolerate_outdated_commits: false,
        }
    }
}

impl ConsumerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_commit_queue_capacity(mut self, capacity: usize) -> Self {
        self.commit_queue_capacity = capacity;
        self
    }

    pub fn with_tolerate_outdated_commits(mut self, tolerate: bool) -> Self {
        self.tolerate_outdated_commits = tolerate;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.commit_queue_capacity == 0 {
            return Err(Error::InvalidConfig(
                "commit_queue_capacity must be greater than zero".to_string(),
            ));
        }
        if self.commit_queue_capacity > MAX_COMMIT_QUEUE_CAPACITY {
            return Err(Error::InvalidConfig(format!(
                "commit_queue_capacity must not exceed {}",
                MAX_COMMIT_QUEUE_CAPACITY
            )));
        }
        Ok(())
    }
}
