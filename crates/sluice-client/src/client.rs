// reqwest implementation of the subscription and partition APIs

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::traits::{EventLogClient, EventStream, PartitionApi, SubscriptionApi};
use async_trait::async_trait;
use futures::TryStreamExt;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Response, StatusCode};
use serde::{Deserialize, Serialize};
use sluice_types::{
    Cursor, CursorCommitResult, CursorDistanceQuery, CursorDistanceResult, EventTypeName,
    Partition, ShiftedCursor, StreamId, StreamParameters, SubscriptionEventStream, SubscriptionId,
};
use std::time::Duration;

/// Response header carrying the stream id of a subscription stream
pub const STREAM_ID_HEADER: &str = "X-Nakadi-StreamId";

/// Event log client (HTTP direct)
pub struct SluiceClient {
    http_client: reqwest::Client,
    base_url: String,
    request_timeout: Duration,
}

impl SluiceClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = &config.access_token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| Error::InvalidConfig("Invalid access token format".to_string()))?;
            headers.insert(AUTHORIZATION, value);
        }

        // No overall timeout here: the events stream stays open indefinitely.
        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(config.connect_timeout())
            .build()?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            request_timeout: config.request_timeout(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn unexpected_status(response: Response) -> Error {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Error::UnexpectedStatus { status, body }
}

#[derive(Serialize)]
struct CommitRequest<'a> {
    items: &'a [Cursor],
}

#[derive(Deserialize)]
struct CommitResponse {
    items: Vec<CursorCommitResult>,
}

// ============================================================================
// TRAIT IMPLEMENTATIONS
// ============================================================================

#[async_trait]
impl SubscriptionApi for SluiceClient {
    async fn open_stream(
        &self,
        subscription_id: &SubscriptionId,
        params: &StreamParameters,
    ) -> Result<EventStream> {
        let response = self
            .http_client
            .get(self.url(&format!("/subscriptions/{}/events", subscription_id)))
            .header(ACCEPT, "application/x-json-stream")
            .query(&params.to_query())
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::NOT_FOUND => {
                return Err(Error::SubscriptionNotFound(subscription_id.clone()))
            }
            _ => return Err(unexpected_status(response).await),
        }

        // Dropping the response on this path closes the connection.
        let stream_id = response
            .headers()
            .get(STREAM_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(StreamId::new)
            .ok_or(Error::StreamIdMissing)?;

        tracing::info!(
            subscription_id = %subscription_id,
            stream_id = %stream_id,
            "Subscription stream opened"
        );

        let body = response.bytes_stream().map_err(Error::from);
        Ok(EventStream::new(
            SubscriptionEventStream::new(subscription_id.clone(), stream_id),
            Box::pin(body),
        ))
    }

    async fn commit_cursors(
        &self,
        subscription_id: &SubscriptionId,
        stream_id: &StreamId,
        cursors: Vec<Cursor>,
    ) -> Result<Vec<CursorCommitResult>> {
        if cursors.is_empty() {
            return Ok(Vec::new());
        }

        tracing::debug!(
            subscription_id = %subscription_id,
            stream_id = %stream_id,
            count = cursors.len(),
            "Committing cursors"
        );

        let response = self
            .http_client
            .post(self.url(&format!("/subscriptions/{}/cursors", subscription_id)))
            .header(STREAM_ID_HEADER, stream_id.as_str())
            .timeout(self.request_timeout)
            .json(&CommitRequest { items: &cursors })
            .send()
            .await?;

        match response.status() {
            StatusCode::NO_CONTENT => Ok(cursors
                .into_iter()
                .map(CursorCommitResult::committed)
                .collect()),
            StatusCode::OK => {
                let body: CommitResponse = response.json().await?;
                Ok(body.items)
            }
            StatusCode::NOT_FOUND => Err(Error::SubscriptionNotFound(subscription_id.clone())),
            StatusCode::UNPROCESSABLE_ENTITY => {
                Err(Error::CommitRejected(response.text().await.unwrap_or_default()))
            }
            _ => Err(unexpected_status(response).await),
        }
    }
}

#[async_trait]
impl PartitionApi for SluiceClient {
    async fn partitions(&self, event_type: &EventTypeName) -> Result<Vec<Partition>> {
        let response = self
            .http_client
            .get(self.url(&format!("/event-types/{}/partitions", event_type)))
            .timeout(self.request_timeout)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(response.json().await?),
            StatusCode::NOT_FOUND => Err(Error::EventTypeNotFound(event_type.clone())),
            _ => Err(unexpected_status(response).await),
        }
    }

    async fn shift_cursors(
        &self,
        event_type: &EventTypeName,
        shifts: Vec<ShiftedCursor>,
    ) -> Result<Vec<Cursor>> {
        let response = self
            .http_client
            .post(self.url(&format!("/event-types/{}/shifted-cursors", event_type)))
            .timeout(self.request_timeout)
            .json(&shifts)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(response.json().await?),
            StatusCode::NOT_FOUND => Err(Error::EventTypeNotFound(event_type.clone())),
            StatusCode::UNPROCESSABLE_ENTITY => Err(Error::CursorDistanceNoResult(
                response.text().await.unwrap_or_default(),
            )),
            _ => Err(unexpected_status(response).await),
        }
    }

    async fn cursor_distances(
        &self,
        event_type: &EventTypeName,
        queries: Vec<CursorDistanceQuery>,
    ) -> Result<Vec<CursorDistanceResult>> {
        let response = self
            .http_client
            .post(self.url(&format!("/event-types/{}/cursor-distances", event_type)))
            .timeout(self.request_timeout)
            .json(&queries)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(response.json().await?),
            StatusCode::NOT_FOUND => Err(Error::EventTypeNotFound(event_type.clone())),
            StatusCode::UNPROCESSABLE_ENTITY => Err(Error::CursorDistanceNoResult(
                response.text().await.unwrap_or_default(),
            )),
            _ => Err(unexpected_status(response).await),
        }
    }
}

impl EventLogClient for SluiceClient {}
