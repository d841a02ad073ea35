//! Axum integration.
//!
//! # Data Flow
//! ```text
//! incoming request
//!     → request.rs (copy out method, path, headers, route pattern)
//!     → middleware/tracking.rs (build state, time the handler)
//!     → handler
//!     → response.rs (custom data and failures from the handler)
//!     → sink.rs (payload handed to the sender)
//! ```

pub mod middleware;
pub mod request;
pub mod response;
pub mod sink;

pub use middleware::{matomo_middleware, MatomoState};
pub use request::RequestMetadata;
pub use response::{CustomTrackingData, RequestFailure};
pub use sink::{ChannelSink, LogSink, PayloadSink, TrackingRequest};
