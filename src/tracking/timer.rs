//! Elapsed-time scopes writing durations into tracking data.
//!
//! ```
//! use matomo_core::tracking::{PerfMsTracker, TrackingData};
//!
//! let mut data = TrackingData::new();
//! let sum = PerfMsTracker::new(&mut data, "pf_srv").track(|| 2 + 2);
//! assert_eq!(sum, 4);
//! assert!(data.contains_key("pf_srv"));
//! ```

use std::future::Future;
use std::time::Instant;

use serde_json::Value;

use crate::tracking::state::TrackingData;

/// Elapsed time since `start` in the unit Matomo's `*_ms` fields carry here:
/// whole nanoseconds divided by 1000.
pub fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_nanos() as f64 / 1000.0
}

/// Single-use timer recording wall-clock time under `key`.
///
/// The value is written when the scope ends, including when it ends by
/// panic or by the surrounding future being dropped. Any previous value at
/// `key` is overwritten.
pub struct PerfMsTracker<'a> {
    scope: &'a mut TrackingData,
    key: String,
}

impl<'a> PerfMsTracker<'a> {
    /// Timer writing into `scope` under `key`.
    pub fn new(scope: &'a mut TrackingData, key: impl Into<String>) -> Self {
        Self {
            scope,
            key: key.into(),
        }
    }

    /// Start the clock; the measurement is recorded when the guard drops.
    pub fn enter(self) -> PerfMsGuard<'a> {
        PerfMsGuard {
            scope: self.scope,
            key: self.key,
            start: Instant::now(),
        }
    }

    /// Time a blocking closure.
    pub fn track<T>(self, f: impl FnOnce() -> T) -> T {
        let _guard = self.enter();
        f()
    }

    /// Time a future, suspension points included.
    pub async fn track_async<F: Future>(self, fut: F) -> F::Output {
        let _guard = self.enter();
        fut.await
    }
}

/// Active timing scope returned by [`PerfMsTracker::enter`].
pub struct PerfMsGuard<'a> {
    scope: &'a mut TrackingData,
    key: String,
    start: Instant,
}

impl Drop for PerfMsGuard<'_> {
    fn drop(&mut self) {
        let elapsed = elapsed_ms(self.start);
        let value = serde_json::Number::from_f64(elapsed)
            .map(Value::Number)
            .unwrap_or(Value::Null);
        self.scope.insert(std::mem::take(&mut self.key), value);
    }
}
