//! # News Verifier
//!
//! Check a news query against a fact-check provider and a news provider at
//! the same time, and show both result sets side by side.
//!
//! ## Architecture
//!
//! 1. **Proxy** ([`server`]): stateless HTTP endpoints that forward a query to
//!    the providers ([`upstream`]) with a server-held API key and return the
//!    provider's result array unchanged
//! 2. **Orchestrator** ([`orchestrator`]): fans one query out to the fact-check
//!    and news endpoints through a [`client::VerifierBackend`], tolerating
//!    either call failing, and owns the resulting view state
//! 3. **Presentation** ([`render`]): draws a view as text for the `verify` client
//!
//! ## Usage
//!
//! ```sh
//! NEWS_API_KEY=... FACT_CHECK_API_KEY=... news_verifier --bind 127.0.0.1:3000
//! verify "climate change"
//! ```

pub mod cli;
pub mod client;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod render;
pub mod server;
pub mod upstream;
pub mod utils;
