use crate::committer::Committer;
use crate::config::ConsumerConfig;
use crate::strategy::CommitStrategy;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use sluice_client::{decode_batches, BatchStream, Error, Result, SubscriptionApi};
use sluice_types::{
    CommitBufferingStrategy, Cursor, EventStreamBatch, HasCursor, StreamParameters,
    SubscriptionEventStream, SubscriptionId,
};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Consumes a subscription: stream, decode, process, commit.
pub struct SubscriptionConsumer {
    api: Arc<dyn SubscriptionApi>,
    config: ConsumerConfig,
}

impl SubscriptionConsumer {
    pub fn new(api: Arc<dyn SubscriptionApi>, config: ConsumerConfig) -> Self {
        Self { api, config }
    }

    pub fn config(&self) -> &ConsumerConfig {
        &self.config
    }

    /// Consume until the server ends the stream or a stage fails.
    ///
    /// `process` runs once per batch, in stream order. Its error ends the
    /// call as [`Error::Processing`] carrying the original error.
    ///
    /// Keep-alive batches (no events) are processed but never committed: the
    /// server repeats a position that is already committed on them.
    pub async fn consume<T, O, F, Fut>(
        &self,
        subscription_id: &SubscriptionId,
        params: &StreamParameters,
        strategy: CommitStrategy,
        process: F,
    ) -> Result<()>
    where
        T: DeserializeOwned + Send + 'static,
        O: HasCursor,
        F: FnMut(EventStreamBatch<T>) -> Fut,
        Fut: Future<Output = anyhow::Result<O>>,
    {
        self.consume_until(
            subscription_id,
            params,
            strategy,
            process,
            std::future::pending::<()>(),
        )
        .await
    }

    /// Like [`consume`](Self::consume), but also stops once `shutdown`
    /// resolves.
    ///
    /// On shutdown no further batch is read. Under the asynchronous
    /// discipline every cursor already queued is committed before returning.
    pub async fn consume_until<T, O, F, Fut, S>(
        &self,
        subscription_id: &SubscriptionId,
        params: &StreamParameters,
        strategy: CommitStrategy,
        process: F,
        shutdown: S,
    ) -> Result<()>
    where
        T: DeserializeOwned + Send + 'static,
        O: HasCursor,
        F: FnMut(EventStreamBatch<T>) -> Fut,
        Fut: Future<Output = anyhow::Result<O>>,
        S: Future<Output = ()>,
    {
        self.config.validate()?;
        strategy.validate()?;

        let event_stream = self.api.open_stream(subscription_id, params).await?;
        let stream = event_stream.stream.clone();
        // Owns the connection; dropped on every return path below.
        let batches = decode_batches::<T>(event_stream.body);

        let result = match strategy {
            CommitStrategy::Sync => self.run_sync(&stream, batches, process, shutdown).await,
            CommitStrategy::Async(buffering) => {
                self.run_async(&stream, batches, process, buffering, shutdown)
                    .await
            }
        };

        match &result {
            Ok(()) => tracing::info!(
                subscription_id = %stream.subscription_id,
                stream_id = %stream.stream_id,
                "Subscription stream finished"
            ),
            Err(e) => tracing::warn!(
                subscription_id = %stream.subscription_id,
                stream_id = %stream.stream_id,
                error = %e,
                "Subscription stream failed"
            ),
        }
        result
    }

    async fn run_sync<T, O, F, Fut, S>(
        &self,
        stream: &SubscriptionEventStream,
        mut batches: BatchStream<T>,
        mut process: F,
        shutdown: S,
    ) -> Result<()>
    where
        O: HasCursor,
        F: FnMut(EventStreamBatch<T>) -> Fut,
        Fut: Future<Output = anyhow::Result<O>>,
        S: Future<Output = ()>,
    {
        let mut committer = Committer::new(
            Arc::clone(&self.api),
            stream.clone(),
            CommitBufferingStrategy::NoBuffer,
            self.config.tolerate_outdated_commits,
        );
        tokio::pin!(shutdown);

        while let Some(batch) = next_batch(&mut batches, &mut shutdown).await {
            let batch = batch?;
            let keep_alive = batch.is_keep_alive();
            let output = process(batch).await.map_err(Error::Processing)?;
            if keep_alive {
                continue;
            }
            committer.commit(vec![output.cursor().clone()]).await?;
        }
        Ok(())
    }

    async fn run_async<T, O, F, Fut, S>(
        &self,
        stream: &SubscriptionEventStream,
        mut batches: BatchStream<T>,
        mut process: F,
        buffering: CommitBufferingStrategy,
        shutdown: S,
    ) -> Result<()>
    where
        O: HasCursor,
        F: FnMut(EventStreamBatch<T>) -> Fut,
        Fut: Future<Output = anyhow::Result<O>>,
        S: Future<Output = ()>,
    {
        let (tx, rx) = mpsc::channel::<Cursor>(self.config.commit_queue_capacity);
        let committer = Committer::new(
            Arc::clone(&self.api),
            stream.clone(),
            buffering,
            self.config.tolerate_outdated_commits,
        );

        // The connection stays open until the committer has drained the
        // queue: commits are only accepted while their stream is alive.
        let producer = async {
            let tx = tx;
            tokio::pin!(shutdown);

            while let Some(batch) = next_batch(&mut batches, &mut shutdown).await {
                let batch = batch?;
                let keep_alive = batch.is_keep_alive();
                let output = process(batch).await.map_err(Error::Processing)?;
                if keep_alive {
                    continue;
                }
                tx.send(output.cursor().clone())
                    .await
                    .map_err(|_| Error::CommitterStopped)?;
            }
            Ok::<(), Error>(())
        };

        // Either side failing drops the other.
        tokio::try_join!(producer, committer.run(rx))?;
        Ok(())
    }
}

/// Next decoded batch, or `None` once the stream ends or shutdown resolves
async fn next_batch<T, S>(
    batches: &mut BatchStream<T>,
    shutdown: &mut std::pin::Pin<&mut S>,
) -> Option<Result<EventStreamBatch<T>>>
where
    S: Future<Output = ()>,
{
    tokio::select! {
        biased;
        _ = shutdown.as_mut() => {
            tracing::info!("Shutdown requested, no further batches are read");
            None
        }
        next = batches.next() => next,
    }
}
