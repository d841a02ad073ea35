//! Request tracking subsystem.
//!
//! # Data Flow
//! ```text
//! RequestInfo
//!     → rules.rs (should this request be reported?)
//!     → tracker.rs (seed TrackingState)
//!     → timer.rs (scoped timings into tracking data)
//!     → tracker.rs (finalize into a flat payload)
//!     → transport.rs (form encoding for the sender)
//! ```
//!
//! # Design Decisions
//! - One `TrackingState` per request, owned by that request; no locking
//! - Tracking data is an ordered JSON map so callers can add any field
//! - Ignored requests still carry a started clock

pub mod rules;
pub mod state;
pub mod timer;
pub mod tracker;
pub mod transport;

pub use rules::{IgnoreRules, PrefixPattern};
pub use state::{RequestInfo, TrackingData, TrackingState};
pub use timer::{PerfMsGuard, PerfMsTracker};
pub use tracker::MatomoCore;
pub use transport::{encode_payload, tracking_url};
