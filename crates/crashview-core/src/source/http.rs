//! Remote source fetcher.
//!
//! Fetches `http(s)://` module URLs with a bounded request timeout so an
//! unreachable host cannot stall the error page indefinitely.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::BoxFuture;

use super::{ReadError, SourceReader};

/// Fetches references over HTTP(S). Any non-2xx status is a failure.
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    /// Create a fetcher with the given per-request timeout and user agent.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, ReadError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| ReadError::Client(e.to_string()))?;
        Ok(Self { client, timeout })
    }

    /// Create a fetcher from the `[fetch]` config section.
    pub fn from_config(config: &crashview_config::FetchConfig) -> Result<Self, ReadError> {
        Self::new(config.timeout(), &config.user_agent)
    }

    /// The configured per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

fn classify(url: &str, err: reqwest::Error) -> ReadError {
    if err.is_timeout() {
        ReadError::Timeout(url.to_string())
    } else {
        ReadError::Network {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}

impl SourceReader for HttpFetcher {
    fn name(&self) -> &str {
        "http"
    }

    fn read_text<'a>(&'a self, reference: &'a str) -> BoxFuture<'a, Result<String, ReadError>> {
        Box::pin(async move {
            debug!(url = %reference, "fetching remote source");

            let resp = self
                .client
                .get(reference)
                .send()
                .await
                .map_err(|e| classify(reference, e))?;

            let status = resp.status();
            if !status.is_success() {
                return Err(ReadError::Status {
                    url: reference.to_string(),
                    status: status.as_u16(),
                });
            }

            resp.text().await.map_err(|e| classify(reference, e))
        })
    }
}
