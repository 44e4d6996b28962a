//! HTTP transport: resource paths are resolved against a base URL.

use super::provider::{SourceTransport, TransportError};
use async_trait::async_trait;
use reqwest::header::{HeaderValue, CACHE_CONTROL};
use std::time::Duration;

/// Cache hint sent with every request; the resources change at most hourly.
const CACHE_HINT: &str = "max-age=3600";

/// Reads resources from a static file host over HTTP.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| TransportError::Http(e.to_string()))?;
        Ok(Self::with_client(client, base_url))
    }

    fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// `"http://host/"` + `"/data/aqi.csv"` → `"http://host/data/aqi.csv"`.
    pub fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl SourceTransport for HttpTransport {
    fn name(&self) -> &str {
        "http"
    }

    async fn get(&self, path: &str) -> Result<String, TransportError> {
        let resp = self
            .client
            .get(self.url_for(path))
            .header(CACHE_CONTROL, HeaderValue::from_static(CACHE_HINT))
            .send()
            .await
            .map_err(|e| TransportError::Http(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(TransportError::NotFound {
                path: path.to_string(),
            });
        }
        if !status.is_success() {
            return Err(TransportError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }

        resp.text()
            .await
            .map_err(|e| TransportError::Http(e.to_string()))
    }
}
