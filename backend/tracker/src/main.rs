//! Paynvest subscription tracker — entry point.
//!
//! Starts a background poller that reads watched PeriodPapaya subscriptions
//! over JSON-RPC, recomputes each account's "total invested" summary and
//! persists it to SQLite. Simultaneously exposes a small Axum REST API for
//! the dashboard.

mod api;
mod config;
mod contract;
mod db;
mod errors;
mod poller;
mod rpc;
mod session;
mod snapshot;

use std::sync::Arc;

use axum::{routing::get, Router};
use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;
use poller::PollerState;
use session::{ChainSession, ContractReader};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load optional .env file (ignored if missing) so RUST_LOG can live there too.
    let _ = dotenvy::dotenv();

    // Initialise structured logging (RUST_LOG controls verbosity).
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("{e}"))?;

    let pool = db::init_pool(&config.database_url).await?;

    let client = Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()?;
    let session = ChainSession::new(client, &config);
    info!("Reading PeriodPapaya {} via {}", config.period_papaya_address, session.rpc_url());
    let reader: Arc<dyn ContractReader> = Arc::new(session);

    let shutdown = CancellationToken::new();

    // ─── Background poller ────────────────────────────────
    let poller_state = Arc::new(PollerState {
        pool: pool.clone(),
        config: config.clone(),
        reader: reader.clone(),
    });
    let poller = tokio::spawn(poller::run(poller_state, shutdown.clone()));

    // ─── REST API ─────────────────────────────────────────
    let api_state = Arc::new(api::ApiState {
        pool,
        config: config.clone(),
        reader,
    });

    let app = Router::new()
        .route("/health", get(api::health))
        .route("/accounts", get(api::list_accounts))
        .route("/accounts/:address/summary", get(api::get_summary))
        .route("/accounts/:address/history", get(api::get_history))
        .route("/accounts/:address/live", get(api::get_live))
        .route("/decode/:encoded", get(api::decode_rates))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(api_state);

    let addr = format!("0.0.0.0:{}", config.api_port);
    info!("API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let signal = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown requested");
            signal.cancel();
        })
        .await?;

    shutdown.cancel();
    poller.await?;
    Ok(())
}
