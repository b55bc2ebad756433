//! Data models for articles, fact checks, and the provider envelopes around them.
//!
//! The providers own these schemas. Only the fields this crate reads are
//! typed; everything else is carried along untouched:
//! - [`Article`]: a news item from the news provider
//! - [`FactCheck`] / [`ClaimReview`]: a claim and its published reviews
//! - [`NewsEnvelope`] / [`FactCheckEnvelope`]: upstream response wrappers,
//!   decoded with [`RawValue`] so the inner array is forwarded byte-for-byte
//! - [`ErrorBody`]: the fixed failure payload the proxy returns
//!
//! The fact-check models use camelCase field names to match the provider's
//! JSON, hence the `#[allow(non_snake_case)]` attributes.

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use serde_json::{Map, Value};

/// A news item as returned by the news provider.
///
/// `title` and `url` are the only fields the presentation reads. The rest
/// (`source`, `author`, `publishedAt`, ...) stays in `extra`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Article {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Article {
    /// The provider's `publishedAt` timestamp, if present and a string.
    pub fn published_at(&self) -> Option<&str> {
        self.extra.get("publishedAt").and_then(Value::as_str)
    }
}

/// A single published review of a claim.
#[allow(non_snake_case)]
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ClaimReview {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    /// The reviewer's verdict, e.g. `"True"`, `"False"`, `"Misleading"`.
    #[serde(default)]
    pub textualRating: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A claim together with the reviews fact-checkers published for it.
#[allow(non_snake_case)]
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FactCheck {
    #[serde(default)]
    pub claimReview: Vec<ClaimReview>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FactCheck {
    /// The review shown for this claim: the first one, when there is one.
    ///
    /// The provider normally sends at least one review, but nothing
    /// guarantees it, so callers get an `Option`.
    pub fn representative(&self) -> Option<&ClaimReview> {
        self.claimReview.first()
    }
}

/// Response body of the news provider's `everything` and `top-headlines` calls.
///
/// Only `articles` is kept, and kept raw.
#[derive(Debug, Deserialize)]
pub struct NewsEnvelope {
    pub articles: Box<RawValue>,
}

/// Response body of the fact-check provider's `claims:search` call.
///
/// The provider leaves `claims` out entirely when nothing matched.
#[derive(Debug, Deserialize)]
pub struct FactCheckEnvelope {
    #[serde(default)]
    pub claims: Option<Box<RawValue>>,
}

/// The fixed payload sent with every proxy failure.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ErrorBody {
    pub message: String,
}
