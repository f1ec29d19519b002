use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::debug;

use crate::config::{LoginSettings, Settings};
use crate::error::HarnessError;

use super::method::HttpMethod;
use super::response::ServiceResponse;

/// HTTP client for the service under test.
///
/// Owns a cookie store so a successful login carries the session across
/// all subsequent rows. Row urls are joined onto the configured base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: reqwest::Url,
}

impl ApiClient {
    pub fn new(settings: &Settings) -> Result<Self, HarnessError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        let base_url = reqwest::Url::parse(&settings.base_url)
            .map_err(|e| HarnessError::InvalidUrl(format!("{}: {e}", settings.base_url)))?;
        Ok(Self { client, base_url })
    }

    /// Authenticate once so later requests ride the session cookie.
    pub async fn login(&self, login: &LoginSettings) -> Result<ServiceResponse, HarnessError> {
        debug!(url = %login.url, "logging in to service under test");
        self.send(HttpMethod::Post, &login.url, Some(&login.payload))
            .await
    }

    /// Issue one request and collect the raw response.
    pub async fn send(
        &self,
        method: HttpMethod,
        url: &str,
        payload: Option<&Value>,
    ) -> Result<ServiceResponse, HarnessError> {
        let url = self
            .base_url
            .join(url)
            .map_err(|e| HarnessError::InvalidUrl(format!("{url}: {e}")))?;

        let mut req_builder = self.client.request(method.into(), url);
        if method.carries_body()
            && let Some(payload) = payload
        {
            req_builder = req_builder.json(payload);
        }

        let started = Instant::now();
        let response = req_builder.send().await?;
        let elapsed = started.elapsed().as_millis();

        let status = response.status();
        let bytes = response.bytes().await?;
        let size_bytes = bytes.len();
        let body = String::from_utf8_lossy(&bytes).into_owned();

        Ok(ServiceResponse {
            status: format!(
                "{} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            ),
            duration_ms: elapsed,
            size_bytes,
            body,
        })
    }
}
