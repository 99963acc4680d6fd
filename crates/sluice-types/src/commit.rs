use crate::cursor::Cursor;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Per-cursor outcome of a commit call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitResult {
    Committed,
    /// A cursor at or past this one was already committed
    Outdated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorCommitResult {
    pub cursor: Cursor,
    pub result: CommitResult,
}

impl CursorCommitResult {
    pub fn committed(cursor: Cursor) -> Self {
        Self {
            cursor,
            result: CommitResult::Committed,
        }
    }
}

/// How the background committer groups cursors into commit calls.
///
/// Buffered variants keep the latest cursor per partition seen within the
/// current window and commit that set when the window closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommitBufferingStrategy {
    /// Commit every cursor as it arrives
    NoBuffer,
    /// Flush once per interval
    TimeWindow { interval: Duration },
    /// Flush after `count` cursors were received
    CountWindow { count: usize },
    /// Flush on whichever limit is hit first
    TimeOrCount { interval: Duration, count: usize },
}

impl Default for CommitBufferingStrategy {
    fn default() -> Self {
        CommitBufferingStrategy::NoBuffer
    }
}

impl CommitBufferingStrategy {
    pub fn time_window(interval: Duration) -> Self {
        CommitBufferingStrategy::TimeWindow { interval }
    }

    pub fn count_window(count: usize) -> Self {
        CommitBufferingStrategy::CountWindow { count }
    }

    pub fn time_or_count(interval: Duration, count: usize) -> Self {
        CommitBufferingStrategy::TimeOrCount { interval, count }
    }

    pub fn interval(&self) -> Option<Duration> {
        match self {
            CommitBufferingStrategy::TimeWindow { interval }
            | CommitBufferingStrategy::TimeOrCount { interval, .. } => Some(*interval),
            _ => None,
        }
    }

    pub fn count(&self) -> Option<usize> {
        match self {
            CommitBufferingStrategy::CountWindow { count }
            | CommitBufferingStrategy::TimeOrCount { count, .. } => Some(*count),
            _ => None,
        }
    }

    pub fn is_buffered(&self) -> bool {
        !matches!(self, CommitBufferingStrategy::NoBuffer)
    }

    /// Reject windows that could never close
    pub fn validate(&self) -> Result<(), String> {
        if self.interval() == Some(Duration::ZERO) {
            return Err("commit window interval must be greater than zero".to_string());
        }
        if self.count() == Some(0) {
            return Err("commit window count must be greater than zero".to_string());
        }
        Ok(())
    }
}
