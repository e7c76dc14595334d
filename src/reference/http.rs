//! Time provider seam and its HTTP implementation.

use super::payload::parse_time_payload;
use super::provider::ProviderInfo;
use super::ProviderError;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use std::time::Duration;

/// A source of the current wall-clock time.
#[async_trait]
pub trait TimeProvider: Send + Sync {
    /// Identifier recorded as the `source` of a successful reading.
    fn id(&self) -> &str;

    async fn fetch(&self) -> Result<NaiveDateTime, ProviderError>;
}

/// JSON-over-HTTP time service. One GET per fetch, no retries, caching off.
pub struct HttpTimeProvider {
    info: ProviderInfo,
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpTimeProvider {
    /// Share one connection pool across providers.
    pub fn with_client(info: ProviderInfo, client: reqwest::Client, timeout: Duration) -> Self {
        Self {
            info,
            client,
            timeout,
        }
    }
}

#[async_trait]
impl TimeProvider for HttpTimeProvider {
    fn id(&self) -> &str {
        &self.info.id
    }

    async fn fetch(&self) -> Result<NaiveDateTime, ProviderError> {
        let response = self
            .client
            .get(&self.info.url)
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        let body: serde_json::Value = response.json().await?;
        parse_time_payload(&body, self.info.naive_zone)
    }
}
