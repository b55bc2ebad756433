//! Command-line interface definitions for the proxy server and the terminal client.
//!
//! All options can be provided via command-line flags or environment variables.
//! Provider API keys belong to the server process only; they are never logged
//! and never sent to a caller.

use clap::Parser;
use std::fmt;
use url::Url;

/// Default upstream base for the news provider.
pub const DEFAULT_NEWS_API_BASE: &str = "https://newsapi.org/v2";

/// Default upstream base for the fact-check provider.
pub const DEFAULT_FACT_CHECK_API_BASE: &str = "https://factchecktools.googleapis.com/v1alpha1";

/// Arguments for the `news_verifier` proxy server.
///
/// # Examples
///
/// ```sh
/// NEWS_API_KEY=... FACT_CHECK_API_KEY=... news_verifier --bind 0.0.0.0:3000
/// ```
#[derive(Parser)]
#[command(author, version, about)]
pub struct ServeArgs {
    /// Address the proxy listens on
    #[arg(short, long, env = "BIND_ADDR", default_value = "127.0.0.1:3000")]
    pub bind: String,

    /// News provider API key
    #[arg(long, env = "NEWS_API_KEY", hide_env_values = true)]
    pub news_api_key: String,

    /// Fact-check provider API key
    #[arg(long, env = "FACT_CHECK_API_KEY", hide_env_values = true)]
    pub fact_check_api_key: String,

    /// Base URL of the news provider
    #[arg(long, env = "NEWS_API_BASE", default_value = DEFAULT_NEWS_API_BASE, value_parser = parse_base_url)]
    pub news_api_base: Url,

    /// Base URL of the fact-check provider
    #[arg(long, env = "FACT_CHECK_API_BASE", default_value = DEFAULT_FACT_CHECK_API_BASE, value_parser = parse_base_url)]
    pub fact_check_api_base: Url,
}

impl fmt::Debug for ServeArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServeArgs")
            .field("bind", &self.bind)
            .field("news_api_key", &"<redacted>")
            .field("fact_check_api_key", &"<redacted>")
            .field("news_api_base", &self.news_api_base.as_str())
            .field("fact_check_api_base", &self.fact_check_api_base.as_str())
            .finish()
    }
}

/// Arguments for the `verify` terminal client.
///
/// ```sh
/// # Search both providers
/// verify "climate change"
///
/// # Latest headlines
/// verify
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct VerifyArgs {
    /// Query to check; omit for the latest headlines
    pub query: Option<String>,

    /// Base URL of a running news_verifier proxy
    #[arg(long, env = "VERIFIER_PROXY_URL", default_value = "http://127.0.0.1:3000", value_parser = parse_base_url)]
    pub proxy: Url,
}

/// Parse an absolute http(s) base URL.
fn parse_base_url(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw).map_err(|e| format!("invalid URL {raw:?}: {e}"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!("unsupported scheme {other:?} in {raw:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_args_defaults() {
        let args = ServeArgs::parse_from([
            "news_verifier",
            "--news-api-key",
            "news-key",
            "--fact-check-api-key",
            "fc-key",
        ]);

        assert_eq!(args.news_api_key, "news-key");
        assert_eq!(args.fact_check_api_key, "fc-key");
        assert_eq!(args.news_api_base.as_str(), "https://newsapi.org/v2");
        assert_eq!(
            args.fact_check_api_base.as_str(),
            "https://factchecktools.googleapis.com/v1alpha1"
        );
    }

    #[test]
    fn test_serve_args_short_bind_flag() {
        let args = ServeArgs::parse_from([
            "news_verifier",
            "-b",
            "0.0.0.0:8080",
            "--news-api-key",
            "k",
            "--fact-check-api-key",
            "k",
            "--news-api-base",
            "http://localhost:9000/v2",
        ]);

        assert_eq!(args.bind, "0.0.0.0:8080");
        assert_eq!(args.news_api_base.as_str(), "http://localhost:9000/v2");
    }

    #[test]
    fn test_serve_args_rejects_bad_base() {
        let result = ServeArgs::try_parse_from([
            "news_verifier",
            "--news-api-key",
            "k",
            "--fact-check-api-key",
            "k",
            "--news-api-base",
            "ftp://newsapi.org",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_serve_args_debug_redacts_keys() {
        let args = ServeArgs::parse_from([
            "news_verifier",
            "--news-api-key",
            "super-secret-news",
            "--fact-check-api-key",
            "super-secret-fc",
        ]);
        let debug = format!("{args:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_verify_args() {
        let args = VerifyArgs::parse_from(["verify", "climate change"]);
        assert_eq!(args.query.as_deref(), Some("climate change"));
        assert_eq!(args.proxy.as_str(), "http://127.0.0.1:3000/");

        let args = VerifyArgs::parse_from(["verify", "--proxy", "http://10.0.0.5:3000"]);
        assert!(args.query.is_none());
    }
}
