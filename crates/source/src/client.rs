// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Root of the public certificate register.
pub const DEFAULT_BASE_URL: &str = "https://find-energy-certificate.service.gov.uk";

/// Transport settings shared by every request of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    /// Root used to resolve root-relative certificate links.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Pause after every request, successful or not.
    pub request_delay: Duration,
    /// Extra attempts after a retryable failure.
    pub retries: u32,
    /// Pause before each retry.
    pub retry_pause: Duration,
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(20),
            request_delay: Duration::from_millis(200),
            retries: 2,
            retry_pause: Duration::from_secs(1),
            user_agent: format!("epc-sync/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// A request that did not produce a body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpError {
    #[error("could not build HTTP client: {0}")]
    Build(String),
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },
    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },
}

impl HttpError {
    /// Transport errors, server errors and rate limiting are worth another
    /// attempt. Other client errors are not.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Build(_) => false,
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::Transport { .. } => true,
        }
    }

    /// Whether the server reports the resource as gone.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404 | 410, .. })
    }
}

/// A polite HTTP client: fixed delay after each request and bounded retries.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    settings: HttpSettings,
}

impl HttpClient {
    /// Builds a client from `settings`.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new(settings: HttpSettings) -> Result<Self, HttpError> {
        let client: reqwest::Client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self { client, settings })
    }

    #[must_use]
    pub const fn settings(&self) -> &HttpSettings {
        &self.settings
    }

    /// Fetches `url` and returns the response body.
    ///
    /// # Errors
    ///
    /// Returns the last error once retries are exhausted, or immediately
    /// for a non-retryable failure.
    pub async fn get_text(&self, url: &str) -> Result<String, HttpError> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            let result: Result<String, HttpError> = self.get_once(url).await;
            if !self.settings.request_delay.is_zero() {
                tokio::time::sleep(self.settings.request_delay).await;
            }

            match result {
                Ok(body) => return Ok(body),
                Err(err) if err.is_retryable() && attempt <= self.settings.retries => {
                    warn!(url, attempt, error = %err, "Request failed, retrying");
                    if !self.settings.retry_pause.is_zero() {
                        tokio::time::sleep(self.settings.retry_pause).await;
                    }
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn get_once(&self, url: &str) -> Result<String, HttpError> {
        debug!(url, "Fetching URL");
        let transport = |err: reqwest::Error| HttpError::Transport {
            url: url.to_string(),
            reason: err.to_string(),
        };

        let response: reqwest::Response = self.client.get(url).send().await.map_err(transport)?;
        let status: reqwest::StatusCode = response.status();
        if !status.is_success() {
            return Err(HttpError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        response.text().await.map_err(transport)
    }
}
