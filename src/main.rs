//! Demo server for the Matomo tracking middleware.
//!
//! Usage: `matomo-demo [config.toml]`
//!
//! Without a config file the tracker points at a local Matomo and payloads
//! are only logged.

use std::net::SocketAddr;
use std::path::Path;

use axum::{
    extract::Path as UrlPath,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
    Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use matomo_core::config::{load_config, MatomoConfig, SiteId};
use matomo_core::http::{CustomTrackingData, LogSink, RequestFailure};
use matomo_core::tracking::{PerfMsTracker, TrackingData};
use matomo_core::{matomo_middleware, MatomoCore, MatomoState};

const BIND_ADDRESS: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "matomo_core=debug,matomo_demo=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => load_config(Path::new(&path))?,
        None => MatomoConfig {
            matomo_url: "http://localhost:8080".to_string(),
            id_site: Some(SiteId::Number(1)),
            ignored_routes: vec!["/health".to_string()],
            ..Default::default()
        },
    };

    let core = MatomoCore::new(config)?;
    tracing::info!(matomo_url = %core.matomo_url(), "Configuration loaded");
    let state = MatomoState::new(core, LogSink)?;

    let app = Router::new()
        .route("/", get(index))
        .route("/items/{id}", get(item))
        .route("/fail", get(fail))
        .route("/health", get(|| async { "ok" }))
        .route_layer(middleware::from_fn_with_state(state, matomo_middleware));

    let listener = TcpListener::bind(BIND_ADDRESS).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn index() -> &'static str {
    "Hello, tracked world"
}

/// Times a lookup step and reports it with a custom variable.
async fn item(UrlPath(id): UrlPath<u64>) -> impl IntoResponse {
    let mut custom = TrackingData::new();
    let name = PerfMsTracker::new(&mut custom, "pf_dm1").track(|| format!("item-{}", id));
    custom.insert("cvar".into(), json!({ "item_id": id }));
    (CustomTrackingData(custom), name)
}

async fn fail() -> impl IntoResponse {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        RequestFailure::new("simulated failure"),
        "failed",
    )
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
    }
    tracing::info!("Shutdown signal received");
}
