//! Clients for the external news and fact-check providers.
//!
//! Both clients make exactly one attempt per call with the HTTP client's
//! default timeout. On success they hand back the provider's result array as
//! raw JSON so the proxy can forward it without re-serializing.
//!
//! # Endpoints
//!
//! | Client | Call | Upstream request |
//! |--------|------|------------------|
//! | [`NewsApi`] | [`everything`](NewsApi::everything) | `GET {base}/everything?q=..&sortBy=popularity&page=1&pagesize=10&language=en&apiKey=..` |
//! | [`NewsApi`] | [`top_headlines`](NewsApi::top_headlines) | `GET {base}/top-headlines?country=us&apiKey=..` |
//! | [`FactCheckApi`] | [`claims_search`](FactCheckApi::claims_search) | `GET {base}/claims:search?query=..&key=..` |

use reqwest::Client;
use serde_json::value::RawValue;
use std::fmt;
use std::time::Instant;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::error::UpstreamError;
use crate::models::{FactCheckEnvelope, NewsEnvelope};
use crate::utils::truncate_for_log;

/// Bytes of a failing upstream body kept in errors and logs.
const BODY_PREVIEW_BYTES: usize = 300;

/// Join a base URL and a relative path without doubling slashes.
fn endpoint(base: &Url, path: &str) -> String {
    format!("{}/{}", base.as_str().trim_end_matches('/'), path)
}

/// Send a GET and return the body text, failing on transport errors or non-2xx.
///
/// `label` names the call in logs; the URL itself carries the key and is never logged.
async fn get_text(http: &Client, url: &str, label: &'static str) -> Result<String, UpstreamError> {
    let t0 = Instant::now();
    // reqwest errors quote the request URL, which carries the key
    let response = http.get(url).send().await.map_err(|e| e.without_url())?;
    let status = response.status();
    let body = response.text().await.map_err(|e| e.without_url())?;
    let dt = t0.elapsed();

    if !status.is_success() {
        warn!(
            call = label,
            status = status.as_u16(),
            elapsed_ms = dt.as_millis() as u64,
            body_preview = %truncate_for_log(&body, BODY_PREVIEW_BYTES),
            "Upstream returned non-success status"
        );
        return Err(UpstreamError::Status {
            status: status.as_u16(),
            body: truncate_for_log(&body, BODY_PREVIEW_BYTES),
        });
    }

    debug!(call = label, bytes = body.len(), elapsed_ms = dt.as_millis() as u64, "Upstream call succeeded");
    Ok(body)
}

/// Client for the news provider.
#[derive(Clone)]
pub struct NewsApi {
    http: Client,
    base: Url,
    key: String,
}

impl fmt::Debug for NewsApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsApi")
            .field("base", &self.base.as_str())
            .finish_non_exhaustive()
    }
}

impl NewsApi {
    pub fn new(http: Client, base: Url, key: impl Into<String>) -> Self {
        Self {
            http,
            base,
            key: key.into(),
        }
    }

    /// URL for a query search. The query is percent-encoded and otherwise untouched;
    /// an empty query is sent as `q=`.
    pub fn everything_url(&self, query: &str) -> String {
        format!(
            "{}?q={}&sortBy=popularity&page=1&pagesize=10&language=en&apiKey={}",
            endpoint(&self.base, "everything"),
            urlencoding::encode(query),
            urlencoding::encode(&self.key),
        )
    }

    /// URL for the latest US headlines.
    pub fn top_headlines_url(&self) -> String {
        format!(
            "{}?country=us&apiKey={}",
            endpoint(&self.base, "top-headlines"),
            urlencoding::encode(&self.key),
        )
    }

    /// Search articles matching `query`, most popular first.
    ///
    /// # Arguments
    ///
    /// * `query` - Search text as typed; empty is sent as `q=`
    ///
    /// # Returns
    ///
    /// The provider's `articles` array as raw JSON, untouched.
    ///
    /// # Errors
    ///
    /// [`UpstreamError::Transport`] when the provider is unreachable,
    /// [`UpstreamError::Status`] on a non-2xx answer, and
    /// [`UpstreamError::Decode`] when the body has no `articles` array.
    #[instrument(level = "info", skip(self))]
    pub async fn everything(&self, query: &str) -> Result<Box<RawValue>, UpstreamError> {
        let body = get_text(&self.http, &self.everything_url(query), "everything").await?;
        let envelope: NewsEnvelope = serde_json::from_str(&body)?;
        Ok(envelope.articles)
    }

    /// Fetch the current top headlines.
    #[instrument(level = "info", skip(self))]
    pub async fn top_headlines(&self) -> Result<Box<RawValue>, UpstreamError> {
        let body = get_text(&self.http, &self.top_headlines_url(), "top-headlines").await?;
        let envelope: NewsEnvelope = serde_json::from_str(&body)?;
        Ok(envelope.articles)
    }
}

/// Client for the fact-check provider.
#[derive(Clone)]
pub struct FactCheckApi {
    http: Client,
    base: Url,
    key: String,
}

impl fmt::Debug for FactCheckApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactCheckApi")
            .field("base", &self.base.as_str())
            .finish_non_exhaustive()
    }
}

impl FactCheckApi {
    pub fn new(http: Client, base: Url, key: impl Into<String>) -> Self {
        Self {
            http,
            base,
            key: key.into(),
        }
    }

    pub fn claims_search_url(&self, query: &str) -> String {
        format!(
            "{}?query={}&key={}",
            endpoint(&self.base, "claims:search"),
            urlencoding::encode(query),
            urlencoding::encode(&self.key),
        )
    }

    /// Search published claim reviews for `query`.
    ///
    /// # Arguments
    ///
    /// * `query` - Claim text to look up
    ///
    /// # Returns
    ///
    /// The provider's `claims` array as raw JSON. The provider omits `claims`
    /// when nothing matched; that becomes `[]`.
    ///
    /// # Errors
    ///
    /// Same as [`NewsApi::everything`]: transport failure, non-2xx status, or
    /// a body that is not a JSON object.
    #[instrument(level = "info", skip(self))]
    pub async fn claims_search(&self, query: &str) -> Result<Box<RawValue>, UpstreamError> {
        let body = get_text(&self.http, &self.claims_search_url(query), "claims:search").await?;
        let envelope: FactCheckEnvelope = serde_json::from_str(&body)?;
        match envelope.claims {
            Some(claims) => Ok(claims),
            None => Ok(RawValue::from_string("[]".to_string())?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::get;

    fn news_api(base: &str) -> NewsApi {
        NewsApi::new(Client::new(), Url::parse(base).unwrap(), "secret key")
    }

    fn fact_check_api(base: &str) -> FactCheckApi {
        FactCheckApi::new(Client::new(), Url::parse(base).unwrap(), "fc-key")
    }

    async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn test_everything_url_encodes_query() {
        let api = news_api("https://newsapi.org/v2");
        assert_eq!(
            api.everything_url("climate change"),
            "https://newsapi.org/v2/everything?q=climate%20change&sortBy=popularity&page=1&pagesize=10&language=en&apiKey=secret%20key"
        );
    }

    #[test]
    fn test_everything_url_passes_empty_query() {
        let api = news_api("https://newsapi.org/v2/");
        assert!(api.everything_url("").starts_with("https://newsapi.org/v2/everything?q=&sortBy"));
    }

    #[test]
    fn test_top_headlines_url() {
        let api = news_api("https://newsapi.org/v2");
        assert_eq!(
            api.top_headlines_url(),
            "https://newsapi.org/v2/top-headlines?country=us&apiKey=secret%20key"
        );
    }

    #[test]
    fn test_claims_search_url() {
        let api = fact_check_api("https://factchecktools.googleapis.com/v1alpha1");
        assert_eq!(
            api.claims_search_url("vaccines & autism"),
            "https://factchecktools.googleapis.com/v1alpha1/claims:search?query=vaccines%20%26%20autism&key=fc-key"
        );
    }

    #[test]
    fn test_debug_hides_key() {
        let api = news_api("https://newsapi.org/v2");
        assert!(!format!("{api:?}").contains("secret"));
    }

    #[tokio::test]
    async fn test_everything_returns_raw_articles() {
        let app = Router::new().route(
            "/v2/everything",
            get(|| async {
                r#"{"status":"ok","articles":[{"url":"https://a.example","title":"A","b":1}]}"#
            }),
        );
        let base = spawn(app).await;

        let articles = news_api(&format!("{base}/v2")).everything("a").await.unwrap();
        assert_eq!(articles.get(), r#"[{"url":"https://a.example","title":"A","b":1}]"#);
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let app = Router::new().route(
            "/top-headlines",
            get(|| async { (StatusCode::UNAUTHORIZED, r#"{"status":"error","code":"apiKeyInvalid"}"#) }),
        );
        let base = spawn(app).await;

        let err = news_api(&base).top_headlines().await.unwrap_err();
        match err {
            UpstreamError::Status { status, body } => {
                assert_eq!(status, 401);
                assert!(body.contains("apiKeyInvalid"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let app = Router::new().route("/everything", get(|| async { "<html>oops</html>" }));
        let base = spawn(app).await;

        let err = news_api(&base).everything("x").await.unwrap_err();
        assert!(matches!(err, UpstreamError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unreachable_is_transport_error() {
        // Bind then drop to get a port nobody is listening on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = news_api(&format!("http://{addr}")).everything("x").await.unwrap_err();
        assert!(matches!(err, UpstreamError::Transport(_)));
    }

    #[tokio::test]
    async fn test_transport_error_hides_key() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = news_api(&format!("http://{addr}")).top_headlines().await.unwrap_err();
        assert!(!err.to_string().contains("secret"));
    }

    #[tokio::test]
    async fn test_claims_search_missing_claims_is_empty() {
        let app = Router::new().fallback(|| async { "{}" });
        let base = spawn(app).await;

        let claims = fact_check_api(&base).claims_search("nothing").await.unwrap();
        assert_eq!(claims.get(), "[]");
    }
}
