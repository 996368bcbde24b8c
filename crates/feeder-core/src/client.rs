//! HTTP client for the feeder REST API.
//!
//! This module provides a client for the small JSON API exposed by the
//! feeder device: the food-remaining reading, the last feed, the schedule,
//! the feed history and the manual feed/schedule mutations.
//!
//! # Example
//!
//! ```no_run
//! use feeder_core::{DeviceClient, FeedSize, FeederApi};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = DeviceClient::new("http://feeder.local:5000")?;
//!
//! let reading = client.get_reading().await?;
//! println!("Food remaining: {}", reading);
//!
//! client.manual_feed(FeedSize::Average).await?;
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use feeder_types::format::normalize_clock;
use feeder_types::{FeedLogEntry, FeedSize, FeedType, LastFeedEntry, Reading, ScheduledFeed};

use crate::error::{Error, Result};
use crate::traits::FeederApi;
use crate::wire::{self, AddFeedTimeRequest, DeleteFeedTimeRequest, ManualFeedRequest, endpoints};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the feeder API.
#[derive(Debug, Clone)]
pub struct DeviceClient {
    client: Client,
    base_url: String,
}

fn normalize_base_url(base_url: &str) -> Result<String> {
    let base_url = base_url.trim().trim_end_matches('/').to_string();

    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(Error::InvalidUrl(format!(
            "URL must start with http:// or https://, got: {}",
            base_url
        )));
    }

    Ok(base_url)
}

impl DeviceClient {
    /// Create a new client with the default timeout.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the feeder (e.g., "http://localhost:5000")
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a new client with a custom per-request timeout.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = normalize_base_url(base_url)?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Network {
                url: base_url.clone(),
                message: e.to_string(),
            })?;

        Ok(Self { client, base_url })
    }

    /// Create a client with a custom reqwest Client.
    pub fn with_client(base_url: &str, client: Client) -> Result<Self> {
        let base_url = normalize_base_url(base_url)?;
        Ok(Self { client, base_url })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    // ======================================================================
    // Internal HTTP helpers
    // ======================================================================

    async fn get_json(&self, endpoint: &str) -> Result<Value> {
        let url = self.url(endpoint);
        debug!("GET {}", url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| network_error(&url, &e))?;

        let response = check_status(response).await?;
        response
            .json::<Value>()
            .await
            .map_err(|e| Error::malformed(endpoint, e.to_string()))
    }

    async fn post<B: Serialize>(&self, endpoint: &str, body: Option<&B>) -> Result<()> {
        let url = self.url(endpoint);
        debug!("POST {}", url);
        let request = self.client.post(&url);
        let request = match body {
            Some(body) => request.json(body),
            None => request,
        };
        let response = request.send().await.map_err(|e| network_error(&url, &e))?;

        // Mutations answer with plain text ("Success"); the body is not decoded.
        check_status(response).await?;
        Ok(())
    }
}

fn network_error(url: &str, err: &reqwest::Error) -> Error {
    Error::Network {
        url: url.to_string(),
        message: err.to_string(),
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let detail = response
        .text()
        .await
        .ok()
        .map(|body| body.trim().to_string())
        .filter(|body| !body.is_empty());

    Err(Error::Server {
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or_default().to_string(),
        detail,
    })
}

#[async_trait]
impl FeederApi for DeviceClient {
    async fn get_reading(&self) -> Result<Reading> {
        let body = self.get_json(endpoints::GET_DISTANCE).await?;
        wire::decode_reading(body)
    }

    async fn get_last_feed(&self) -> Result<Option<LastFeedEntry>> {
        let body = self.get_json(endpoints::GET_LAST_FEED).await?;
        wire::decode_last_feed(body)
    }

    async fn get_feed_times(&self) -> Result<Vec<ScheduledFeed>> {
        let body = self.get_json(endpoints::GET_FEED_TIMES).await?;
        wire::decode_feed_times(body)
    }

    async fn get_feed_logs(&self) -> Result<Vec<FeedLogEntry>> {
        let body = self.get_json(endpoints::GET_FEEDING_TIMES).await?;
        wire::decode_feed_logs(body)
    }

    async fn manual_feed(&self, size: FeedSize) -> Result<()> {
        self.post(endpoints::MANUAL_FEED, Some(&ManualFeedRequest { size }))
            .await
    }

    async fn add_feed_time(&self, time: &str, feed_type: FeedType, size: FeedSize) -> Result<()> {
        let body = AddFeedTimeRequest {
            time: normalize_clock(time)?,
            feed_type,
            size,
        };
        self.post(endpoints::ADD_FEED_TIME, Some(&body)).await
    }

    async fn delete_feed_time(&self, time: &str) -> Result<()> {
        let body = DeleteFeedTimeRequest {
            time: time.to_string(),
        };
        self.post(endpoints::DELETE_FEED_TIME, Some(&body)).await
    }

    async fn toggle_camera(&self) -> Result<()> {
        self.post::<()>(endpoints::TOGGLE_CAMERA, None).await
    }
}
