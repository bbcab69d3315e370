use anyhow::{anyhow, Context, Result};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use ultra_sor::config::AppConfig;
use ultra_sor::router::{build_router, create_api_router, ApiState};
use ultra_sor::tokens::TokenProvider;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing().context("initialize tracing subscriber")?;

    if let Err(err) = run().await {
        tracing::error!(error = ?err, "fatal router error");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> Result<()> {
    let config = AppConfig::load().context("load configuration from environment")?;

    let tokens = Arc::new(
        TokenProvider::load(&config.token_list)
            .await
            .with_context(|| format!("load token list {}", config.token_list))?,
    );
    info!(list = %tokens.list_name(), "token list loaded");

    let router = build_router(&config, tokens.clone()).context("build swap router")?;

    let state = Arc::new(ApiState {
        router,
        tokens,
        chain_id: config.chain_id,
    });
    let app = create_api_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(config.api_addr)
        .await
        .with_context(|| format!("bind API server address {}", config.api_addr))?;

    info!(
        address = %config.api_addr,
        chain = %config.chain_id,
        router = %config.router,
        top_n = config.routing.top_n,
        max_hops = config.routing.max_hops,
        max_splits = config.routing.max_splits,
        distribution_percent = config.routing.distribution_percent,
        "smart order router online"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve HTTP API")?;
    info!("router stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "ctrl_c listener error");
    }
    info!("Shutdown signal received, exiting");
}

fn init_tracing() -> Result<()> {
    let env_filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info,hyper=warn,reqwest=warn".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(env_filter))
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow!("tracing subscriber init: {err}"))
}
