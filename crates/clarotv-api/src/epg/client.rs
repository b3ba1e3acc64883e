//! `EpgClient` - Claro TV EPG API client implementation.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::instrument;
use url::Url;

use super::api::LocalEpgApi;
use super::error::FetchError;
use super::params::ScheduleQuery;
use super::types::EpgResponse;

/// Default `livechannels` endpoint.
pub const DEFAULT_BASE_URL: &str = "https://www.clarotvmais.com.br/avsclient/1.2/epg/livechannels";

/// Default host for channel logos.
pub const DEFAULT_IMAGE_BASE_URL: &str = "http://mondrian.claro.com.br";

/// Budget for a whole request (connect, send, and read).
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(3);

/// Claro TV EPG API client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct EpgClient {
    /// HTTP client (reqwest, gzip enabled, fixed timeout).
    http_client: Client,
    /// Endpoint URL.
    base_url: Url,
    /// Per-request timeout.
    timeout: Duration,
}

/// Builder for `EpgClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct EpgClientBuilder {
    base_url: Option<Url>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
}

impl EpgClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            user_agent: None,
            timeout: None,
        }
    }

    /// Overrides the endpoint URL (config or wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Overrides the request timeout (default: 3s). Intended for tests.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<EpgClient> {
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let timeout = self.timeout.unwrap_or(REQUEST_TIMEOUT);

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(EpgClient {
            http_client,
            base_url,
            timeout,
        })
    }
}

impl EpgClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> EpgClientBuilder {
        EpgClientBuilder::new()
    }

    /// Endpoint URL in use.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Request timeout in use.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Decodes a `livechannels` body.
    pub(crate) fn parse_response(body: &str) -> Result<EpgResponse, FetchError> {
        serde_json::from_str(body).map_err(|e| {
            let preview = &body[..body.floor_char_boundary(200)];
            FetchError::Decode(format!("{e} (len={}, body={preview:?})", body.len()))
        })
    }
}

impl LocalEpgApi for EpgClient {
    #[instrument(skip_all, fields(location = %query.location()))]
    async fn fetch_schedule(&self, query: &ScheduleQuery) -> Result<EpgResponse, FetchError> {
        let request = self
            .http_client
            .get(self.base_url.clone())
            .query(&query.to_query_pairs())
            .build()
            .map_err(|e| FetchError::from_reqwest(&e))?;

        tracing::debug!(url = %request.url(), "EPG API request");

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|e| FetchError::from_reqwest(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(&e))?;
        tracing::debug!(body_len = body.len(), "Response body received");

        let parsed = Self::parse_response(&body)?;
        tracing::debug!(
            channels = parsed.channels.len(),
            programs = parsed.program_count(),
            "EPG response decoded"
        );
        Ok(parsed)
    }
}
