//! Matomo request tracking for axum services.
//!
//! Decides per request whether it is reported, builds the Matomo payload,
//! measures processing time and finalizes the payload once the response is
//! known. Sending the payload is left to a [`http::PayloadSink`].

pub mod config;
pub mod constants;
pub mod error;
pub mod http;
pub mod tracking;

pub use config::MatomoConfig;
pub use constants::HTTP_METHODS;
pub use error::ConfigError;
pub use http::{matomo_middleware, MatomoState};
pub use tracking::{MatomoCore, PerfMsTracker, RequestInfo, TrackingData, TrackingState};
