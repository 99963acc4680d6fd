use crate::window::CursorWindow;
use sluice_client::{Error, Result, SubscriptionApi};
use sluice_types::{
    CommitBufferingStrategy, CommitResult, Cursor, CursorCommitResult, SubscriptionEventStream,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Last position committed per (event type, partition) on one stream
#[derive(Debug, Default)]
pub(crate) struct CommittedCursors {
    last: HashMap<(String, String), String>,
}

impl CommittedCursors {
    fn key(cursor: &Cursor) -> (String, String) {
        (
            cursor.event_type.clone().unwrap_or_default(),
            cursor.partition.clone(),
        )
    }

    /// True when the cursor points at the position already committed for its partition
    pub(crate) fn is_repeat(&self, cursor: &Cursor) -> bool {
        self.last
            .get(&Self::key(cursor))
            .is_some_and(|offset| *offset == cursor.offset)
    }

    pub(crate) fn record(&mut self, cursors: &[Cursor]) {
        for cursor in cursors {
            self.last.insert(Self::key(cursor), cursor.offset.clone());
        }
    }
}

/// Background side of the asynchronous commit discipline.
///
/// Drains the cursor queue and commits according to the buffering strategy.
/// Returns once the queue is closed and everything received was committed.
/// A cursor repeating the position last committed for its partition on this
/// stream is not sent again.
pub struct Committer {
    api: Arc<dyn SubscriptionApi>,
    stream: SubscriptionEventStream,
    buffering: CommitBufferingStrategy,
    tolerate_outdated: bool,
    committed: CommittedCursors,
}

impl Committer {
    pub fn new(
        api: Arc<dyn SubscriptionApi>,
        stream: SubscriptionEventStream,
        buffering: CommitBufferingStrategy,
        tolerate_outdated: bool,
    ) -> Self {
        Self {
            api,
            stream,
            buffering,
            tolerate_outdated,
            committed: CommittedCursors::default(),
        }
    }

    pub async fn run(mut self, rx: mpsc::Receiver<Cursor>) -> Result<()> {
        if self.buffering.is_buffered() {
            self.run_windowed(rx).await
        } else {
            self.run_unbuffered(rx).await
        }
    }

    async fn run_unbuffered(&mut self, mut rx: mpsc::Receiver<Cursor>) -> Result<()> {
        while let Some(cursor) = rx.recv().await {
            self.commit(vec![cursor]).await?;
        }
        Ok(())
    }

    async fn run_windowed(&mut self, mut rx: mpsc::Receiver<Cursor>) -> Result<()> {
        let mut window = CursorWindow::new(self.buffering);

        loop {
            tokio::select! {
                received = rx.recv() => match received {
                    Some(cursor) => {
                        if window.push(cursor) {
                            self.flush(&mut window).await?;
                        }
                    }
                    None => {
                        self.flush(&mut window).await?;
                        return Ok(());
                    }
                },
                _ = window.tick() => {
                    self.flush(&mut window).await?;
                }
            }
        }
    }

    async fn flush(&mut self, window: &mut CursorWindow) -> Result<()> {
        let received = window.received();
        let cursors = window.take();
        if cursors.is_empty() {
            return Ok(());
        }

        tracing::debug!(
            received,
            committing = cursors.len(),
            "Flushing commit window"
        );
        self.commit(cursors).await
    }

    /// Commit the cursors not yet committed on this stream
    pub(crate) async fn commit(&mut self, cursors: Vec<Cursor>) -> Result<()> {
        let cursors: Vec<Cursor> = cursors
            .into_iter()
            .filter(|cursor| !self.committed.is_repeat(cursor))
            .collect();
        if cursors.is_empty() {
            return Ok(());
        }

        let results = self
            .api
            .commit_cursors(
                &self.stream.subscription_id,
                &self.stream.stream_id,
                cursors.clone(),
            )
            .await?;
        check_commit_results(results, self.tolerate_outdated)?;
        self.committed.record(&cursors);
        Ok(())
    }
}

/// Fail on the first cursor the server reports as already committed
pub(crate) fn check_commit_results(
    results: Vec<CursorCommitResult>,
    tolerate_outdated: bool,
) -> Result<()> {
    for item in results {
        if item.result == CommitResult::Outdated {
            if !tolerate_outdated {
                return Err(Error::CursorAlreadyCommitted(item.cursor));
            }
            tracing::warn!(
                partition = %item.cursor.partition,
                offset = %item.cursor.offset,
                "Skipping outdated commit"
            );
        }
    }
    Ok(())
}
