/// External API clients module
use crate::errors::ApiResult;
use chrono::NaiveDate;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// HTTP client wrapper with common configuration
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("planetary-defense/1.0")
            .build()?;
        Ok(Self { client })
    }

    pub fn get_client(&self) -> &Client {
        &self.client
    }
}

/// NASA NeoWs client
pub struct NasaClient {
    http_client: HttpClient,
    feed_url: String,
    api_key: String,
}

impl NasaClient {
    pub fn new(feed_url: String, api_key: String, timeout: Duration) -> ApiResult<Self> {
        Ok(Self {
            http_client: HttpClient::new(timeout)?,
            feed_url,
            api_key,
        })
    }

    /// Fetch Near Earth Objects feed for a date window
    pub async fn fetch_neo_feed(&self, start: NaiveDate, end: NaiveDate) -> ApiResult<Value> {
        debug!("Requesting NEO feed {} .. {}", start, end);

        let mut req = self.http_client.get_client().get(&self.feed_url).query(&[
            ("start_date", start.to_string()),
            ("end_date", end.to_string()),
        ]);

        if !self.api_key.is_empty() {
            req = req.query(&[("api_key", &self.api_key)]);
        }

        let json = req.send().await?.error_for_status()?.json().await?;
        Ok(json)
    }
}
