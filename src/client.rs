//! Backend seam between the orchestrator and the proxy endpoints.
//!
//! [`VerifierBackend`] is what the orchestrator calls; [`ProxyClient`] is the
//! real implementation, talking HTTP to a running proxy. Each call is a single
//! attempt and is independent of every other call.

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Instant;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::error::FetchError;
use crate::models::{Article, ErrorBody, FactCheck};

/// The three calls the orchestrator makes.
///
/// These futures are awaited on the orchestrator's own task and are not
/// required to be `Send`.
#[allow(async_fn_in_trait)]
pub trait VerifierBackend {
    /// Fact checks matching `query`.
    async fn fact_checks(&self, query: &str) -> Result<Vec<FactCheck>, FetchError>;

    /// News articles matching `query`.
    async fn news(&self, query: &str) -> Result<Vec<Article>, FetchError>;

    /// Latest headlines, no query.
    async fn headlines(&self) -> Result<Vec<Article>, FetchError>;
}

/// [`VerifierBackend`] over HTTP against the proxy endpoints.
#[derive(Debug, Clone)]
pub struct ProxyClient {
    http: Client,
    base: Url,
}

impl ProxyClient {
    pub fn new(http: Client, base: Url) -> Self {
        Self { http, base }
    }

    /// Build the proxy URL for an endpoint.
    ///
    /// # Arguments
    ///
    /// * `path` - Endpoint path starting with `/`, e.g. `/api/news`
    /// * `query` - Search text, percent-encoded into `?query=` when given
    ///
    /// # Returns
    ///
    /// The absolute URL as a string. A trailing slash on the base is dropped.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let client = ProxyClient::new(Client::new(), Url::parse("http://127.0.0.1:3000/")?);
    /// assert_eq!(client.url("/api/factcheck", Some("a b")), "http://127.0.0.1:3000/api/factcheck?query=a%20b");
    /// ```
    pub fn url(&self, path: &str, query: Option<&str>) -> String {
        let root = self.base.as_str().trim_end_matches('/');
        match query {
            Some(q) => format!("{root}{path}?query={}", urlencoding::encode(q)),
            None => format!("{root}{path}"),
        }
    }

    #[instrument(level = "debug", skip(self))]
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let t0 = Instant::now();
        let response = self.http.get(url).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .map(|b| b.message)
                .unwrap_or_else(|_| String::from_utf8_lossy(&bytes).into_owned());
            warn!(status = status.as_u16(), %message, "Proxy call failed");
            return Err(FetchError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let value = serde_json::from_slice(&bytes)?;
        debug!(elapsed_ms = t0.elapsed().as_millis() as u64, "Proxy call succeeded");
        Ok(value)
    }
}

impl VerifierBackend for ProxyClient {
    async fn fact_checks(&self, query: &str) -> Result<Vec<FactCheck>, FetchError> {
        self.get_json(&self.url("/api/factcheck", Some(query))).await
    }

    async fn news(&self, query: &str) -> Result<Vec<Article>, FetchError> {
        self.get_json(&self.url("/api/news", Some(query))).await
    }

    async fn headlines(&self) -> Result<Vec<Article>, FetchError> {
        self.get_json(&self.url("/api/latestNews", None)).await
    }
}
