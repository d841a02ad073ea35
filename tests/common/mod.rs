//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware,
    response::IntoResponse,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tokio::sync::mpsc;

use matomo_core::config::{MatomoConfig, SiteId};
use matomo_core::http::{ChannelSink, CustomTrackingData, RequestFailure, TrackingRequest};
use matomo_core::tracking::TrackingData;
use matomo_core::{matomo_middleware, MatomoCore, MatomoState};

/// Config tracking site 3 on example.com with `/ignored` skipped.
pub fn base_config() -> MatomoConfig {
    MatomoConfig {
        matomo_url: "https://example.com".into(),
        id_site: Some(SiteId::from("3")),
        ignored_routes: vec!["/ignored".into()],
        ..Default::default()
    }
}

/// App with the middleware installed as a route layer.
pub fn tracked_app(config: MatomoConfig) -> (Router, mpsc::UnboundedReceiver<TrackingRequest>) {
    let (sink, rx) = ChannelSink::new();
    let state = MatomoState::new(MatomoCore::new(config).unwrap(), sink).unwrap();
    let app = routes().route_layer(middleware::from_fn_with_state(state, matomo_middleware));
    (app, rx)
}

/// App with the middleware wrapping the whole router, fallback included.
pub fn outer_layer_app(config: MatomoConfig) -> (Router, mpsc::UnboundedReceiver<TrackingRequest>) {
    let (sink, rx) = ChannelSink::new();
    let state = MatomoState::new(MatomoCore::new(config).unwrap(), sink).unwrap();
    let app = routes().layer(middleware::from_fn_with_state(state, matomo_middleware));
    (app, rx)
}

fn routes() -> Router {
    Router::new()
        .route("/items/{id}", get(|| async { "item" }).post(|| async { "created" }))
        .route("/ignored", get(|| async { "quiet" }))
        .route("/custom", get(custom))
        .route("/fail", get(fail))
}

async fn custom() -> impl IntoResponse {
    let mut data = TrackingData::new();
    data.insert("cvar".into(), json!({ "extra": "x" }));
    data.insert("dimension1".into(), json!("blue"));
    (CustomTrackingData(data), "custom")
}

async fn fail() -> impl IntoResponse {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        RequestFailure::new("db down"),
        "failed",
    )
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("Host", "example.com")
        .header("User-Agent", "ua")
        .body(Body::empty())
        .unwrap()
}

/// Decode the JSON text stored under `cvar`.
pub fn decoded_cvar(payload: &TrackingData) -> Value {
    let text = payload["cvar"].as_str().expect("cvar is JSON text");
    serde_json::from_str(text).unwrap()
}
