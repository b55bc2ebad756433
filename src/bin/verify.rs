//! `verify`: check a query from the terminal through a running proxy.
//!
//! With a query, runs both searches and prints fact checks next to news.
//! Without one, prints the latest headlines.

use clap::Parser;
use std::error::Error;
use tracing::debug;
use tracing_subscriber::{fmt as tfmt, EnvFilter};

use news_verifier::cli::VerifyArgs;
use news_verifier::client::ProxyClient;
use news_verifier::orchestrator::Orchestrator;
use news_verifier::render::render_view;

/// Width of each result column.
const COLUMN_WIDTH: usize = 60;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Logs go to stderr so they never interleave with the rendered results.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = VerifyArgs::parse();
    debug!(?args, "Parsed CLI arguments");

    let backend = ProxyClient::new(reqwest::Client::new(), args.proxy);
    match args.query {
        Some(query) => {
            let orchestrator = Orchestrator::with_initial_query(backend, query);
            orchestrator.start().await;
            print!("{}", render_view(&orchestrator.view(), COLUMN_WIDTH));
        }
        None => {
            let orchestrator = Orchestrator::new(backend);
            orchestrator.headlines().await;
            print!("{}", render_view(&orchestrator.view(), COLUMN_WIDTH));
        }
    }
    Ok(())
}
