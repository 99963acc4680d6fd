use sluice_types::{CommitBufferingStrategy, Cursor};
use std::collections::BTreeMap;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

/// Commit window of the buffered strategies.
///
/// Keeps the latest cursor per (event type, partition). Cursors of one
/// partition arrive in stream order, so the latest is also the most advanced.
pub struct CursorWindow {
    latest: BTreeMap<(String, String), Cursor>,
    received: usize,
    count_limit: Option<usize>,
    ticker: Option<Interval>,
}

impl CursorWindow {
    pub fn new(strategy: CommitBufferingStrategy) -> Self {
        let ticker = strategy.interval().map(|period| {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker
        });

        Self {
            latest: BTreeMap::new(),
            received: 0,
            count_limit: strategy.count(),
            ticker,
        }
    }

    /// Add a cursor; returns true when the count limit closes the window
    pub fn push(&mut self, cursor: Cursor) -> bool {
        let key = (
            cursor.event_type.clone().unwrap_or_default(),
            cursor.partition.clone(),
        );
        self.latest.insert(key, cursor);
        self.received += 1;

        self.count_limit.is_some_and(|limit| self.received >= limit)
    }

    /// Close the window, returning its cursors and starting a fresh one
    pub fn take(&mut self) -> Vec<Cursor> {
        self.received = 0;
        if let Some(ticker) = self.ticker.as_mut() {
            ticker.reset();
        }
        std::mem::take(&mut self.latest).into_values().collect()
    }

    /// Resolves when the time limit closes the window; never without one
    pub async fn tick(&mut self) {
        match self.ticker.as_mut() {
            Some(ticker) => {
                ticker.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }

    /// Cursors received since the window opened
    pub fn received(&self) -> usize {
        self.received
    }

    pub fn is_empty(&self) -> bool {
        self.latest.is_empty()
    }
}
