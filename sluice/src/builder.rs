//! High-level builder API wiring client, consumer and cursor arithmetic

use serde::de::DeserializeOwned;
use sluice_client::{ClientConfig, Error, Result, SluiceClient};
use sluice_consumer::{CommitStrategy, ConsumerConfig, CursorCalculator, SubscriptionConsumer};
use sluice_types::{
    Cursor, CursorDistance, EventStreamBatch, EventTypeName, HasCursor, StreamParameters,
    SubscriptionId,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Builder for [`Sluice`]
///
/// # Example
///
/// ```rust,no_run
/// use sluice::prelude::*;
///
/// # fn main() -> Result<(), Error> {
/// let sluice = SluiceBuilder::new()
///     .base_url("https://events.example.org")
///     .commit_queue_capacity(256)
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct SluiceBuilder {
    base_url: Option<String>,
    access_token: Option<String>,
    connect_timeout: Option<Duration>,
    request_timeout: Option<Duration>,
    consumer_config: ConsumerConfig,
}

impl Default for SluiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SluiceBuilder {
    pub fn new() -> Self {
        Self {
            base_url: None,
            access_token: None,
            connect_timeout: None,
            request_timeout: None,
            consumer_config: ConsumerConfig::default(),
        }
    }

    /// Start from an existing client configuration
    pub fn client_config(mut self, config: ClientConfig) -> Self {
        self.base_url = Some(config.base_url.clone());
        self.access_token = config.access_token.clone();
        self.connect_timeout = Some(config.connect_timeout());
        self.request_timeout = Some(config.request_timeout());
        self
    }

    /// Set the API base URL (required)
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn consumer_config(mut self, config: ConsumerConfig) -> Self {
        self.consumer_config = config;
        self
    }

    pub fn commit_queue_capacity(mut self, capacity: usize) -> Self {
        self.consumer_config.commit_queue_capacity = capacity;
        self
    }

    pub fn tolerate_outdated_commits(mut self, tolerate: bool) -> Self {
        self.consumer_config.tolerate_outdated_commits = tolerate;
        self
    }

    pub fn build(self) -> Result<Sluice> {
        let base_url = self
            .base_url
            .ok_or_else(|| Error::InvalidConfig("base_url is required".to_string()))?;
        self.consumer_config.validate()?;

        let mut config = ClientConfig::new(base_url);
        if let Some(token) = self.access_token {
            config = config.with_access_token(token);
        }
        if let Some(timeout) = self.connect_timeout {
            config = config.with_connect_timeout(timeout);
        }
        if let Some(timeout) = self.request_timeout {
            config = config.with_request_timeout(timeout);
        }

        let client = Arc::new(SluiceClient::new(config)?);
        Ok(Sluice {
            consumer: SubscriptionConsumer::new(client.clone(), self.consumer_config),
            cursors: CursorCalculator::new(client.clone()),
            client,
        })
    }
}

/// One configured connection to the event log
pub struct Sluice {
    client: Arc<SluiceClient>,
    consumer: SubscriptionConsumer,
    cursors: CursorCalculator,
}

impl Sluice {
    pub fn builder() -> SluiceBuilder {
        SluiceBuilder::new()
    }

    pub fn client(&self) -> &Arc<SluiceClient> {
        &self.client
    }

    pub fn cursors(&self) -> &CursorCalculator {
        &self.cursors
    }

    /// See [`SubscriptionConsumer::consume`]
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
        self.consumer
            .consume(subscription_id, params, strategy, process)
            .await
    }

    /// See [`SubscriptionConsumer::consume_until`]
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
        self.consumer
            .consume_until(subscription_id, params, strategy, process, shutdown)
            .await
    }

    pub async fn shift(
        &self,
        event_type: &EventTypeName,
        cursors: &[Cursor],
        n: u64,
    ) -> Result<Vec<Cursor>> {
        self.cursors.shift(event_type, cursors, n).await
    }

    pub async fn distance(
        &self,
        event_type: &EventTypeName,
        a: &Cursor,
        b: &Cursor,
    ) -> Result<CursorDistance> {
        self.cursors.distance(event_type, a, b).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_requires_base_url() {
        let result = SluiceBuilder::new().build();
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_build_rejects_empty_commit_queue() {
        let result = SluiceBuilder::new()
            .base_url("http://localhost:8080")
            .commit_queue_capacity(0)
            .build();
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn test_shift_by_zero_needs_no_server() {
        let sluice = SluiceBuilder::new()
            .base_url("http://127.0.0.1:9")
            .build()
            .unwrap();
        let cursors = vec![Cursor::new("0", "001-0001-000000000000000001")];

        let shifted = sluice
            .shift(&EventTypeName::new("orders"), &cursors, 0)
            .await
            .unwrap();
        assert_eq!(shifted, cursors);
    }
}
