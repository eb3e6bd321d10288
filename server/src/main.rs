use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use url::Url;

use leapfrog_lib::{DOCS_HOST, DocsClient, FetchPolicy};
use leapfrog_server::{AppState, router};

/// HTTP API serving scraped .NET breaking-change breakdowns.
#[derive(Parser, Debug)]
#[command(
    name = "leapfrog",
    version,
    about = "Scrapes the .NET compatibility docs and serves per-migration breaking-change breakdowns"
)]
struct Cli {
    /// Address to bind the HTTP server to (host:port).
    #[arg(long, env = "LEAPFROG_BIND", default_value = "127.0.0.1:8080")]
    bind: String,

    /// Base URL of the documentation host to scrape.
    #[arg(long, env = "LEAPFROG_DOCS_BASE", default_value = DOCS_HOST)]
    docs_base: Url,

    /// Abort a request on the first failed version instead of
    /// reporting it and continuing with the rest of the range.
    #[arg(long, env = "LEAPFROG_FAIL_FAST")]
    fail_fast: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let client = DocsClient::with_base(cli.docs_base).context("failed to build docs client")?;
    let policy = if cli.fail_fast {
        FetchPolicy::FailFast
    } else {
        FetchPolicy::BestEffort
    };
    let app = router(AppState { client, policy });

    let addr: SocketAddr = cli
        .bind
        .parse()
        .with_context(|| format!("invalid bind address {}", cli.bind))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "leapfrog listening");

    axum::serve(listener, app).await.context("server shutdown")?;
    Ok(())
}
