//! Error types for upstream calls, proxy responses, and client fetches.
//!
//! Every error here is scoped to a single request. Nothing is fatal to the
//! process and nothing is retried.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::models::ErrorBody;

/// Body sent when the news provider cannot be reached or answers badly.
pub const NEWS_FAILURE_MESSAGE: &str = "Failed to fetch news from NewsAPI.";

/// Body sent when the fact-check provider cannot be reached or answers badly.
pub const FACT_CHECK_FAILURE_MESSAGE: &str = "Failed to fetch fact checks.";

/// A failed call to an external provider.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("provider unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider answered HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("provider sent a malformed body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Which provider a proxy failure belongs to; selects the fixed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feed {
    News,
    FactCheck,
}

impl Feed {
    pub fn failure_message(self) -> &'static str {
        match self {
            Feed::News => NEWS_FAILURE_MESSAGE,
            Feed::FactCheck => FACT_CHECK_FAILURE_MESSAGE,
        }
    }
}

/// An upstream failure on its way out of a proxy endpoint.
///
/// Renders as HTTP 500 with a fixed [`ErrorBody`]; the cause is only logged.
#[derive(Debug, Error)]
#[error("{feed:?} proxy failed: {source}")]
pub struct ProxyError {
    pub feed: Feed,
    #[source]
    pub source: UpstreamError,
}

impl ProxyError {
    pub fn news(source: UpstreamError) -> Self {
        Self {
            feed: Feed::News,
            source,
        }
    }

    pub fn fact_check(source: UpstreamError) -> Self {
        Self {
            feed: Feed::FactCheck,
            source,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            message: self.feed.failure_message().to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// A failed call from the orchestrator's backend to a proxy endpoint.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("empty query")]
    EmptyQuery,

    #[error("proxy unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("proxy answered HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("proxy sent a malformed body: {0}")]
    Decode(#[from] serde_json::Error),
}
