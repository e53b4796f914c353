use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{
    TidesRequest,
    error::{Result, TidesError},
    response,
};

use super::TidesApi;

/// Production datagetter endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.tidesandcurrents.noaa.gov/api/prod/datagetter";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// reqwest-backed client for the NOAA Tides and Currents API.
///
/// One GET per call, nothing cached or retried.
#[derive(Debug, Clone)]
pub struct NoaaClient {
    base_url: String,
    http: Client,
}

impl NoaaClient {
    pub fn new() -> Result<Self> {
        Self::with_settings(DEFAULT_BASE_URL, DEFAULT_TIMEOUT)
    }

    pub fn with_settings(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into();
        Url::parse(&base_url)
            .map_err(|e| TidesError::InvalidRequest(format!("invalid base URL '{base_url}': {e}")))?;

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("noaa-core/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl TidesApi for NoaaClient {
    async fn fetch_json(&self, request: &TidesRequest) -> Result<Value> {
        let url = request.url(&self.base_url)?;
        debug!(%url, "requesting NOAA data");

        let res = self.http.get(url).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            warn!(%status, "NOAA request failed");
            return Err(TidesError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let parsed: Value = serde_json::from_str(&body)?;

        if let Some(message) = response::api_error(&parsed) {
            warn!(%message, "NOAA API returned an error");
            return Err(TidesError::Api(message));
        }

        Ok(parsed)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
