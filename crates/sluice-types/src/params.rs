use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Consume parameters sent with the streaming request.
///
/// Every field is optional; unset fields are left to the server default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamParameters {
    /// Maximum number of events per batch
    pub batch_limit: Option<u32>,
    /// Number of events after which the server closes the stream
    pub stream_limit: Option<u32>,
    /// Longest time the server waits to fill a batch
    pub batch_flush_timeout: Option<Duration>,
    /// Lifetime of the stream before the server closes it
    pub stream_timeout: Option<Duration>,
    /// Number of empty keep-alive batches before the server closes the stream
    pub stream_keep_alive_limit: Option<u32>,
    pub max_uncommitted_events: Option<u32>,
    pub commit_timeout: Option<Duration>,
}

impl StreamParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn batch_limit(mut self, limit: u32) -> Self {
        self.batch_limit = Some(limit);
        self
    }

    pub fn stream_limit(mut self, limit: u32) -> Self {
        self.stream_limit = Some(limit);
        self
    }

    pub fn batch_flush_timeout(mut self, timeout: Duration) -> Self {
        self.batch_flush_timeout = Some(timeout);
        self
    }

    pub fn stream_timeout(mut self, timeout: Duration) -> Self {
        self.stream_timeout = Some(timeout);
        self
    }

    pub fn stream_keep_alive_limit(mut self, limit: u32) -> Self {
        self.stream_keep_alive_limit = Some(limit);
        self
    }

    pub fn max_uncommitted_events(mut self, max: u32) -> Self {
        self.max_uncommitted_events = Some(max);
        self
    }

    pub fn commit_timeout(mut self, timeout: Duration) -> Self {
        self.commit_timeout = Some(timeout);
        self
    }

    /// Query string pairs, durations rendered in whole seconds
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();

        if let Some(v) = self.batch_limit {
            query.push(("batch_limit", v.to_string()));
        }
        if let Some(v) = self.stream_limit {
            query.push(("stream_limit", v.to_string()));
        }
        if let Some(v) = self.batch_flush_timeout {
            query.push(("batch_flush_timeout", v.as_secs().to_string()));
        }
        if let Some(v) = self.stream_timeout {
            query.push(("stream_timeout", v.as_secs().to_string()));
        }
        if let Some(v) = self.stream_keep_alive_limit {
            query.push(("stream_keep_alive_limit", v.to_string()));
        }
        if let Some(v) = self.max_uncommitted_events {
            query.push(("max_uncommitted_events", v.to_string()));
        }
        if let Some(v) = self.commit_timeout {
            query.push(("commit_timeout", v.as_secs().to_string()));
        }

        query
    }
}
