use std::sync::Arc;

use axum::{
    extract::FromRef,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use dotenv::dotenv;
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use tracing::info;

mod accounts;
mod bluesky;
mod config;
mod error;
mod follower;
mod pacing;
mod response;
mod scraper;

use bluesky::{Bluesky, XrpcClient};
use config::settings::Settings;

#[derive(Clone)]
pub struct AppState {
    bluesky: Arc<dyn Bluesky>,
    shutdown: CancellationToken,
}

impl FromRef<AppState> for Arc<dyn Bluesky> {
    fn from_ref(app_state: &AppState) -> Arc<dyn Bluesky> {
        app_state.bluesky.clone()
    }
}

impl FromRef<AppState> for CancellationToken {
    fn from_ref(app_state: &AppState) -> CancellationToken {
        app_state.shutdown.clone()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let settings = Settings::new();

    let client = XrpcClient::new(
        &settings.service_url,
        &settings.appview_url,
        settings.request_timeout,
    )?;

    info!(
        service = %settings.service_url,
        appview = %settings.appview_url,
        "bluesky client ready"
    );

    let shutdown = CancellationToken::new();
    let app_state = AppState {
        bluesky: Arc::new(client),
        shutdown: shutdown.clone(),
    };

    let app = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/scrape", post(scraper::handler::scrape))
        .route("/follow", post(follower::handler::follow))
        .with_state(app_state);

    info!("Server running on http://localhost:{}", settings.port);

    let listener = tokio::net::TcpListener::bind(settings.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    Ok(())
}

async fn root() -> Json<Value> {
    Json(json!({
        "service": "Bluesky Automation API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health",
            "scrape": "/scrape (POST)",
            "follow": "/follow (POST)",
        }
    }))
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// Resolves on Ctrl-C or SIGTERM and cancels in-flight scrape/follow runs,
/// which stop at their next page or account boundary.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown requested, cancelling running batches");
    shutdown.cancel();
}
