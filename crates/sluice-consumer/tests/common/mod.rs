#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use futures::{stream, StreamExt};
use sluice_client::{ByteStream, Error, EventStream, PartitionApi, Result, SubscriptionApi};
use sluice_types::{
    CommitResult, Cursor, CursorCommitResult, CursorDistanceQuery, CursorDistanceResult,
    EventTypeName, Partition, ShiftedCursor, StreamId, StreamParameters,
    SubscriptionEventStream, SubscriptionId,
};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const EVENT_TYPE: &str = "orders";
pub const STREAM_ID: &str = "stream-1";

// ============================================================================
// SUBSCRIPTION FAKE
// ============================================================================

/// Serves a fixed list of lines and records every commit call
pub struct FakeSubscription {
    lines: Vec<String>,
    endless: bool,
    stream_id: Option<String>,
    chunk_delay: Option<Duration>,
    commit_delay: Option<Duration>,
    fail_commit_at: Option<usize>,
    outdated: bool,
    track_positions: bool,
    positions: Mutex<BTreeMap<String, String>>,
    pub opens: AtomicUsize,
    pub commits: Mutex<Vec<Vec<Cursor>>>,
    pub released: Arc<AtomicBool>,
}

impl FakeSubscription {
    pub fn new(lines: Vec<String>) -> Self {
        Self {
            lines,
            endless: false,
            stream_id: Some(STREAM_ID.to_string()),
            chunk_delay: None,
            commit_delay: None,
            fail_commit_at: None,
            outdated: false,
            track_positions: false,
            positions: Mutex::new(BTreeMap::new()),
            opens: AtomicUsize::new(0),
            commits: Mutex::new(Vec::new()),
            released: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Keep the connection open after the last line
    pub fn endless(mut self) -> Self {
        self.endless = true;
        self
    }

    pub fn without_stream_id(mut self) -> Self {
        self.stream_id = None;
        self
    }

    pub fn chunk_delay(mut self, delay: Duration) -> Self {
        self.chunk_delay = Some(delay);
        self
    }

    pub fn commit_delay(mut self, delay: Duration) -> Self {
        self.commit_delay = Some(delay);
        self
    }

    /// Reject the commit call with this index (0-based)
    pub fn fail_commit_at(mut self, index: usize) -> Self {
        self.fail_commit_at = Some(index);
        self
    }

    pub fn report_outdated(mut self) -> Self {
        self.outdated = true;
        self
    }

    /// Report `outdated` for cursors at or behind their partition's committed offset
    pub fn track_positions(mut self) -> Self {
        self.track_positions = true;
        self
    }

    pub fn commit_calls(&self) -> Vec<Vec<Cursor>> {
        self.commits.lock().unwrap().clone()
    }

    pub fn committed(&self) -> Vec<Cursor> {
        self.commit_calls().into_iter().flatten().collect()
    }

    pub fn committed_count(&self) -> usize {
        self.commits.lock().unwrap().iter().map(Vec::len).sum()
    }

    pub fn was_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }
}

struct ReleaseGuard(Arc<AtomicBool>);

impl Drop for ReleaseGuard {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl SubscriptionApi for FakeSubscription {
    async fn open_stream(
        &self,
        subscription_id: &SubscriptionId,
        _params: &StreamParameters,
    ) -> Result<EventStream> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        if subscription_id.as_str() == "missing" {
            return Err(Error::SubscriptionNotFound(subscription_id.clone()));
        }
        let stream_id = self.stream_id.clone().ok_or(Error::StreamIdMissing)?;

        let items: Vec<Result<Bytes>> = self
            .lines
            .iter()
            .map(|line| Ok(Bytes::from(format!("{}\n", line))))
            .collect();

        let mut body: ByteStream = Box::pin(stream::iter(items));
        if let Some(delay) = self.chunk_delay {
            body = Box::pin(body.then(move |item| async move {
                tokio::time::sleep(delay).await;
                item
            }));
        }
        if self.endless {
            body = Box::pin(body.chain(stream::pending()));
        }
        let guard = ReleaseGuard(Arc::clone(&self.released));
        let body: ByteStream = Box::pin(body.map(move |item| {
            let _keep = &guard;
            item
        }));

        Ok(EventStream::new(
            SubscriptionEventStream::new(subscription_id.clone(), StreamId::new(stream_id)),
            body,
        ))
    }

    async fn commit_cursors(
        &self,
        _subscription_id: &SubscriptionId,
        stream_id: &StreamId,
        cursors: Vec<Cursor>,
    ) -> Result<Vec<CursorCommitResult>> {
        if stream_id.as_str() != STREAM_ID {
            return Err(Error::CommitRejected(format!("unknown stream {}", stream_id)));
        }
        if let Some(delay) = self.commit_delay {
            tokio::time::sleep(delay).await;
        }

        let mut commits = self.commits.lock().unwrap();
        if self.fail_commit_at == Some(commits.len()) {
            return Err(Error::CommitRejected("rejected by fake".to_string()));
        }
        commits.push(cursors.clone());

        let mut positions = self.positions.lock().unwrap();
        Ok(cursors
            .into_iter()
            .map(|cursor| {
                let behind = self.track_positions
                    && positions
                        .get(&cursor.partition)
                        .is_some_and(|committed| cursor.offset <= *committed);
                let result = if self.outdated || behind {
                    CommitResult::Outdated
                } else {
                    positions.insert(cursor.partition.clone(), cursor.offset.clone());
                    CommitResult::Committed
                };
                CursorCommitResult { cursor, result }
            })
            .collect())
    }
}

pub fn cursor(partition: &str, offset: u64) -> Cursor {
    Cursor::new(partition, format!("{:018}", offset))
        .with_event_type(EVENT_TYPE)
        .with_cursor_token(format!("token-{}-{}", partition, offset))
}

/// One stream line carrying a single event
pub fn batch_line(partition: &str, offset: u64) -> String {
    serde_json::json!({
        "cursor": cursor(partition, offset),
        "events": [{"partition": partition, "n": offset}],
    })
    .to_string()
}

/// One stream line without events, repeating the partition's position
pub fn keep_alive_line(partition: &str, offset: u64) -> String {
    serde_json::json!({
        "cursor": cursor(partition, offset).with_cursor_token("keep-alive"),
    })
    .to_string()
}

/// `count` lines spread round-robin over `partitions` partitions
pub fn batch_lines(count: u64, partitions: u64) -> (Vec<String>, Vec<Cursor>) {
    let mut lines = Vec::new();
    let mut cursors = Vec::new();
    for i in 0..count {
        let partition = (i % partitions).to_string();
        let offset = i / partitions;
        lines.push(batch_line(&partition, offset));
        cursors.push(cursor(&partition, offset));
    }
    (lines, cursors)
}

// ============================================================================
// PARTITION FAKE
// ============================================================================

/// Event log with numeric offsets hidden behind opaque-looking tokens
pub struct FakeLog {
    partitions: Mutex<BTreeMap<String, (i64, i64)>>,
    pub calls: AtomicUsize,
    pub shift_calls: AtomicUsize,
}

fn encode(offset: i64) -> String {
    format!("001-0001-{:018}", offset)
}

fn decode(offset: &str) -> Result<i64> {
    offset
        .rsplit('-')
        .next()
        .and_then(|n| n.parse().ok())
        .ok_or_else(|| Error::CursorDistanceNoResult(format!("bad offset {}", offset)))
}

impl FakeLog {
    /// `count` partitions holding offsets `oldest..=newest`
    pub fn new(count: usize, oldest: i64, newest: i64) -> Self {
        let partitions = (0..count)
            .map(|p| (p.to_string(), (oldest, newest)))
            .collect();
        Self {
            partitions: Mutex::new(partitions),
            calls: AtomicUsize::new(0),
            shift_calls: AtomicUsize::new(0),
        }
    }

    pub fn publish(&self, partition: &str, events: i64) {
        let mut partitions = self.partitions.lock().unwrap();
        if let Some((_, newest)) = partitions.get_mut(partition) {
            *newest += events;
        }
    }

    pub fn publish_all(&self, events: i64) {
        let mut partitions = self.partitions.lock().unwrap();
        for (_, newest) in partitions.values_mut() {
            *newest += events;
        }
    }

    pub fn cursor_at(&self, partition: &str, offset: i64) -> Cursor {
        Cursor::new(partition, encode(offset))
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn range(&self, partition: &str) -> Result<(i64, i64)> {
        self.partitions
            .lock()
            .unwrap()
            .get(partition)
            .copied()
            .ok_or_else(|| Error::CursorDistanceNoResult(format!("no partition {}", partition)))
    }
}

#[async_trait]
impl PartitionApi for FakeLog {
    async fn partitions(&self, _event_type: &EventTypeName) -> Result<Vec<Partition>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let partitions = self.partitions.lock().unwrap();
        Ok(partitions
            .iter()
            .map(|(id, (oldest, newest))| Partition {
                partition: id.clone(),
                oldest_available_offset: encode(*oldest),
                newest_available_offset: encode(*newest),
                unconsumed_events: None,
            })
            .collect())
    }

    async fn shift_cursors(
        &self,
        _event_type: &EventTypeName,
        shifts: Vec<ShiftedCursor>,
    ) -> Result<Vec<Cursor>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.shift_calls.fetch_add(1, Ordering::SeqCst);
        shifts
            .into_iter()
            .map(|shift| {
                let (oldest, newest) = self.range(&shift.partition)?;
                let target = decode(&shift.offset)? + shift.shift;
                if target < oldest || target > newest {
                    return Err(Error::CursorDistanceNoResult("shift out of range".to_string()));
                }
                Ok(Cursor::new(shift.partition, encode(target)))
            })
            .collect()
    }

    async fn cursor_distances(
        &self,
        _event_type: &EventTypeName,
        queries: Vec<CursorDistanceQuery>,
    ) -> Result<Vec<CursorDistanceResult>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        queries
            .into_iter()
            .map(|query| {
                if query.initial_cursor.partition != query.final_cursor.partition {
                    return Err(Error::CursorDistanceNoResult("partition mismatch".to_string()));
                }
                let (oldest, newest) = self.range(&query.initial_cursor.partition)?;
                let initial = decode(&query.initial_cursor.offset)?;
                let final_ = decode(&query.final_cursor.offset)?;
                for offset in [initial, final_] {
                    if offset < oldest || offset > newest {
                        return Err(Error::CursorDistanceNoResult(
                            "offset outside retained range".to_string(),
                        ));
                    }
                }
                Ok(CursorDistanceResult {
                    distance: final_ - initial,
                    initial_cursor: query.initial_cursor,
                    final_cursor: query.final_cursor,
                })
            })
            .collect()
    }
}
