//! Proxy endpoints in front of the news and fact-check providers.
//!
//! Each handler forwards the caller's `query` to one provider with the
//! server-held API key attached, and answers with the provider's result array
//! exactly as received. Any upstream failure is logged and turned into a 500
//! with a fixed message (see [`ProxyError`]).
//!
//! # Routes
//!
//! | Route | Upstream call |
//! |-------|---------------|
//! | `GET /api/news?query=` | [`NewsApi::everything`] |
//! | `GET /api/latestNews` | [`NewsApi::top_headlines`] |
//! | `GET /api/factcheck?query=` | [`FactCheckApi::claims_search`] |
//! | `GET /` | liveness check |

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use itertools::Itertools;
use serde::Deserialize;
use serde_json::value::RawValue;
use tower_http::trace::TraceLayer;
use tracing::{error, info, instrument};

use crate::cli::ServeArgs;
use crate::error::ProxyError;
use crate::upstream::{FactCheckApi, NewsApi};

/// Shared handler state: one client per provider.
#[derive(Debug, Clone)]
pub struct AppState {
    pub news: NewsApi,
    pub fact_check: FactCheckApi,
}

impl AppState {
    /// Build provider clients from server arguments, sharing one connection pool.
    pub fn from_args(args: &ServeArgs) -> Self {
        let http = reqwest::Client::new();
        Self {
            news: NewsApi::new(http.clone(), args.news_api_base.clone(), args.news_api_key.clone()),
            fact_check: FactCheckApi::new(
                http,
                args.fact_check_api_base.clone(),
                args.fact_check_api_key.clone(),
            ),
        }
    }
}

/// Query string of the search endpoints, kept as raw pairs.
///
/// A repeated `query` key is not an error: its values are joined with `,`.
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct SearchParams(Vec<(String, String)>);

impl SearchParams {
    /// The `query` value to forward; empty when the key is absent.
    pub fn query(&self) -> String {
        self.0
            .iter()
            .filter(|(key, _)| key == "query")
            .map(|(_, value)| value.as_str())
            .join(",")
    }
}

/// Build the proxy router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "ok" }))
        .route("/api/news", get(news))
        .route("/api/latestNews", get(latest_news))
        .route("/api/factcheck", get(factcheck))
        .with_state(Arc::new(state))
        // method + path only; the query string can be sensitive to the user
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        )
}

/// Bind `args.bind` and serve until the process is stopped.
pub async fn serve(args: ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::from_args(&args);
    let listener = tokio::net::TcpListener::bind(&args.bind).await?;
    info!(addr = %listener.local_addr()?, "Proxy listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// A 200 response whose body is the raw upstream JSON.
fn raw_json(raw: Box<RawValue>) -> Response {
    let body: Box<str> = raw.into();
    ([(CONTENT_TYPE, "application/json")], String::from(body)).into_response()
}

#[instrument(level = "info", skip_all, fields(query = %params.query()))]
async fn news(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Response, ProxyError> {
    let query = params.query();
    match state.news.everything(&query).await {
        Ok(articles) => Ok(raw_json(articles)),
        Err(e) => {
            error!(error = %e, "Failed to fetch news");
            Err(ProxyError::news(e))
        }
    }
}

#[instrument(level = "info", skip_all)]
async fn latest_news(State(state): State<Arc<AppState>>) -> Result<Response, ProxyError> {
    match state.news.top_headlines().await {
        Ok(articles) => Ok(raw_json(articles)),
        Err(e) => {
            error!(error = %e, "Failed to fetch latest news");
            Err(ProxyError::news(e))
        }
    }
}

#[instrument(level = "info", skip_all, fields(query = %params.query()))]
async fn factcheck(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Response, ProxyError> {
    let query = params.query();
    match state.fact_check.claims_search(&query).await {
        Ok(claims) => Ok(raw_json(claims)),
        Err(e) => {
            error!(error = %e, "Failed to fetch fact checks");
            Err(ProxyError::fact_check(e))
        }
    }
}
