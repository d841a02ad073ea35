//! Axum middleware.

pub mod tracking;

pub use tracking::{matomo_middleware, MatomoState};
