//! Per-request tracking state.

use std::time::Instant;

use serde_json::{Map, Value};

/// Open mapping of tracking fields, kept in insertion order.
pub type TrackingData = Map<String, Value>;

/// Everything known about one request while it is being tracked.
///
/// Owned by the request flow that built it and consumed by
/// [`MatomoCore::prepare_tracking_data`](crate::tracking::MatomoCore::prepare_tracking_data).
#[derive(Debug, Clone)]
pub struct TrackingState {
    /// Whether this request is reported at all.
    pub tracking: bool,
    /// Monotonic start marker.
    pub start: Instant,
    pub tracking_data: TrackingData,
    /// Extra fields merged at finalization; `cvar` is merged key by key.
    pub custom_tracking_data: Option<TrackingData>,
}

impl TrackingState {
    /// State for a request that will not be reported.
    pub fn ignored() -> Self {
        Self {
            tracking: false,
            start: Instant::now(),
            tracking_data: TrackingData::new(),
            custom_tracking_data: None,
        }
    }

    /// State for a reported request, starting the clock now.
    pub fn tracked(tracking_data: TrackingData) -> Self {
        Self {
            tracking: true,
            start: Instant::now(),
            tracking_data,
            custom_tracking_data: None,
        }
    }

    /// Add custom fields, later keys overwriting earlier ones.
    pub fn add_custom_tracking_data(&mut self, data: TrackingData) {
        self.custom_tracking_data
            .get_or_insert_with(TrackingData::new)
            .extend(data);
    }
}

/// Request metadata supplied by the host framework.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestInfo<'a> {
    pub user_agent: &'a str,
    pub request_path: &'a str,
    pub request_url: &'a str,
    pub method: &'a str,
    pub remote_addr: Option<&'a str>,
    /// Route pattern matched by the router; empty when nothing matched.
    pub url_rule: &'a str,
    pub referrer: Option<&'a str>,
    /// First address from `X-Forwarded-For`, preferred over `remote_addr`.
    pub forwarded_for: Option<&'a str>,
    pub lang: Option<&'a str>,
}

/// Merge `custom` into `data`, merging a `cvar` object into the existing one.
pub(crate) fn merge_custom_data(data: &mut TrackingData, custom: TrackingData) {
    for (key, value) in custom {
        if key == "cvar" {
            if let Value::Object(extra) = &value {
                if let Some(Value::Object(existing)) = data.get_mut("cvar") {
                    existing.extend(extra.clone());
                    continue;
                }
            }
        }
        data.insert(key, value);
    }
}
