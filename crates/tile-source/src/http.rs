//! HTTP transport used by sources to reach upstream servers.

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Url};
use tracing::debug;

use crate::error::{SourceError, SourceResult};
use crate::params::ParamTable;

/// Fetches a URL with a query string and returns the response body.
///
/// Any non-success outcome (connection failure, timeout, non-2xx status) is
/// reported as [`SourceError::Transport`]. Implementations do not retry.
#[async_trait]
pub trait HttpFetcher: Send + Sync {
    async fn fetch(&self, url: &str, params: &ParamTable) -> SourceResult<Bytes>;
}

/// Transport settings.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// TCP connect timeout
    pub connect_timeout: Duration,
    /// Whole-request timeout, body included
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            timeout: Duration::from_secs(30),
            user_agent: concat!("tile-source/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpConfig {
    /// Defaults, overridden by `TILE_HTTP_CONNECT_TIMEOUT_SECS`,
    /// `TILE_HTTP_TIMEOUT_SECS` and `TILE_HTTP_USER_AGENT` when set.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let secs = |var: &str, fallback: Duration| {
            env::var(var)
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(fallback)
        };

        Self {
            connect_timeout: secs("TILE_HTTP_CONNECT_TIMEOUT_SECS", defaults.connect_timeout),
            timeout: secs("TILE_HTTP_TIMEOUT_SECS", defaults.timeout),
            user_agent: env::var("TILE_HTTP_USER_AGENT").unwrap_or(defaults.user_agent),
        }
    }
}

/// Builds the full request URL, appending `params` after any query string
/// already present on `base`. A trailing `&` on `base` is dropped.
pub fn request_url(base: &str, params: &ParamTable) -> SourceResult<Url> {
    let base = base.trim_end_matches('&');
    Url::parse_with_params(base, params.iter()).map_err(|e| SourceError::Transport {
        url: base.to_string(),
        message: format!("invalid url: {}", e),
    })
}

/// [`HttpFetcher`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    pub fn new(config: &HttpConfig) -> SourceResult<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| SourceError::InvalidConfig(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpFetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str, params: &ParamTable) -> SourceResult<Bytes> {
        let full_url = request_url(url, params)?;
        debug!(url = %full_url, "Issuing upstream request");

        let transport = |e: reqwest::Error| SourceError::Transport {
            url: full_url.to_string(),
            message: e.to_string(),
        };

        let response = self
            .client
            .get(full_url.clone())
            .send()
            .await
            .map_err(transport)?
            .error_for_status()
            .map_err(transport)?;

        response.bytes().await.map_err(transport)
    }
}
