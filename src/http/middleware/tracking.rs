//! Matomo tracking middleware.
//! Reports every eligible request once its response is ready.
//!
//! Install with `route_layer` so the matched route pattern is available:
//!
//! ```ignore
//! let app = Router::new()
//!     .route("/items/{id}", get(item))
//!     .route_layer(middleware::from_fn_with_state(state, matomo_middleware));
//! ```

use std::error::Error;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::constants::SERVER_TIME_KEY;
use crate::error::{ConfigError, ConfigResult};
use crate::http::request::RequestMetadata;
use crate::http::response::{CustomTrackingData, RequestFailure};
use crate::http::sink::PayloadSink;
use crate::tracking::{MatomoCore, PerfMsTracker};

/// State required for tracking.
#[derive(Clone)]
pub struct MatomoState {
    core: Arc<MatomoCore>,
    sink: Arc<dyn PayloadSink>,
}

impl MatomoState {
    /// Fails up front when no site id is configured, rather than on the
    /// first request.
    pub fn new(core: MatomoCore, sink: impl PayloadSink + 'static) -> ConfigResult<Self> {
        if core.id_site().is_none() {
            return Err(ConfigError::MissingIdSite);
        }
        Ok(Self {
            core: Arc::new(core),
            sink: Arc::new(sink),
        })
    }
}

/// Tracks the request and submits its payload to the configured sink.
pub async fn matomo_middleware(
    State(state): State<MatomoState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    // 1. Decide and seed
    let metadata = RequestMetadata::from_request(&req);
    let mut tracking_state = match state.core.build_tracking_state(&metadata.as_request_info()) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Cannot build tracking state");
            return next.run(req).await;
        }
    };
    if !tracking_state.tracking {
        tracing::trace!(path = %metadata.request_path, "Request not tracked");
        return next.run(req).await;
    }

    // 2. Run the handler under the server-time scope
    let response = PerfMsTracker::new(&mut tracking_state.tracking_data, SERVER_TIME_KEY)
        .track_async(next.run(req))
        .await;

    // 3. Finalize
    MatomoCore::track_request_end(response.status().as_u16(), &mut tracking_state);
    if let Some(CustomTrackingData(custom)) = response.extensions().get::<CustomTrackingData>() {
        tracking_state.add_custom_tracking_data(custom.clone());
    }
    let failure = response.extensions().get::<RequestFailure>();
    let payload = MatomoCore::prepare_tracking_data(
        tracking_state,
        failure.map(|f| f as &dyn Error),
    );

    if let Some(payload) = payload {
        tracing::debug!(
            method = %metadata.method,
            route = %metadata.url_rule,
            status = response.status().as_u16(),
            "Submitting tracking payload"
        );
        state.sink.submit(state.core.matomo_url(), payload);
    }

    response
}
