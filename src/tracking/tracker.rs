//! Tracking decisions and payload assembly.
//!
//! # Data Flow
//! ```text
//! request start
//!     → build_tracking_state (filter, then seed fields)
//!     → [PerfMsTracker scopes add timings]
//! request end
//!     → track_request_end (gt_ms, status code)
//!     → prepare_tracking_data (custom data, error, cvar as JSON text)
//!     → flat payload for the sender
//! ```

use std::collections::HashMap;
use std::error::Error;

use rand::Rng;
use serde_json::{json, Map, Value};

use crate::config::{MatomoConfig, SiteId};
use crate::constants::{DEFAULT_ENDPOINT, GENERATION_TIME_KEY, KNOWN_ENDPOINTS, NOT_FOUND_ACTION};
use crate::error::{ConfigError, ConfigResult};
use crate::tracking::rules::IgnoreRules;
use crate::tracking::state::{merge_custom_data, RequestInfo, TrackingData, TrackingState};
use crate::tracking::timer::elapsed_ms;

/// Central interface deciding what to track and building Matomo payloads.
#[derive(Debug, Clone)]
pub struct MatomoCore {
    matomo_url: String,
    id_site: Option<SiteId>,
    token_auth: Option<String>,
    base_url: Option<String>,
    routes_details: HashMap<String, Map<String, Value>>,
    rules: IgnoreRules,
}

impl MatomoCore {
    /// Validate `config` and compile its filtering rules.
    pub fn new(config: MatomoConfig) -> ConfigResult<Self> {
        if config.matomo_url.is_empty() {
            return Err(ConfigError::MissingMatomoUrl);
        }

        let rules = IgnoreRules::from_config(&config)?;
        let token_auth = config.token_auth.filter(|t| !t.is_empty());
        if token_auth.is_none() {
            tracing::warn!("'token_auth' not given, NOT tracking ip-address");
        }

        Ok(Self {
            matomo_url: normalize_matomo_url(&config.matomo_url),
            id_site: config.id_site.filter(SiteId::is_set),
            token_auth,
            base_url: config
                .base_url
                .map(|url| url.trim_matches('/').to_string())
                .filter(|url| !url.is_empty()),
            routes_details: config.routes_details,
            rules,
        })
    }

    /// Collector endpoint, always ending in a known `*.php` filename.
    pub fn matomo_url(&self) -> &str {
        &self.matomo_url
    }

    /// Configured site id, if set.
    pub fn id_site(&self) -> Option<&SiteId> {
        self.id_site.as_ref()
    }

    /// Returns true if a request with these attributes must not be tracked.
    pub fn should_request_be_ignored(&self, url_rule: &str, method: &str, user_agent: &str) -> bool {
        self.rules.should_ignore(url_rule, method, user_agent)
    }

    /// Start tracking a request.
    ///
    /// Ignored requests still get a started clock, so callers can treat
    /// every state alike.
    pub fn build_tracking_state(&self, request: &RequestInfo<'_>) -> ConfigResult<TrackingState> {
        let id_site = self.id_site.as_ref().ok_or(ConfigError::MissingIdSite)?;

        if self.should_request_be_ignored(request.url_rule, request.method, request.user_agent) {
            return Ok(TrackingState::ignored());
        }

        let url = match &self.base_url {
            Some(base) => format!("{}{}", base, request.request_path),
            None => request.request_url.to_string(),
        };
        let action_name = if request.url_rule.is_empty() {
            NOT_FOUND_ACTION
        } else {
            request.url_rule
        };

        let mut data = TrackingData::new();
        // site data
        data.insert("idsite".into(), Value::String(id_site.to_string()));
        data.insert("rec".into(), json!("1"));
        data.insert("apiv".into(), json!("1"));
        data.insert("send_image".into(), json!("0"));
        // request data
        data.insert("ua".into(), json!(request.user_agent));
        data.insert("action_name".into(), json!(action_name));
        data.insert("url".into(), json!(url));
        data.insert(
            "cvar".into(),
            json!({
                "http_status_code": null,
                "http_method": request.method,
            }),
        );
        data.insert("rand".into(), json!(rand::thread_rng().gen::<u32>()));

        if let Some(token) = &self.token_auth {
            data.insert("token_auth".into(), json!(token));
            if let Some(ip) = request.forwarded_for.or(request.remote_addr) {
                data.insert("cip".into(), json!(ip));
            }
        }
        if let Some(lang) = request.lang {
            data.insert("lang".into(), json!(lang));
        }
        if let Some(referrer) = request.referrer {
            data.insert("urlref".into(), json!(referrer));
        }

        if let Some(details) = self.routes_details.get(action_name) {
            data.extend(details.clone());
        }

        Ok(TrackingState::tracked(data))
    }

    /// Record total time and response status. No-op for ignored requests.
    pub fn track_request_end(status_code: u16, state: &mut TrackingState) {
        if !state.tracking {
            return;
        }

        let gt_ms = elapsed_ms(state.start);
        if let Some(number) = serde_json::Number::from_f64(gt_ms) {
            state.tracking_data.insert(GENERATION_TIME_KEY.into(), Value::Number(number));
        }

        match state.tracking_data.get_mut("cvar") {
            Some(Value::Object(cvar)) => {
                cvar.insert("http_status_code".into(), json!(status_code));
            }
            _ => {
                state
                    .tracking_data
                    .insert("cvar".into(), json!({ "http_status_code": status_code }));
            }
        }
    }

    /// Turn a finished state into the flat payload sent to Matomo.
    ///
    /// Returns `None` when the request is not tracked. `cvar` comes out as
    /// compact JSON text.
    pub fn prepare_tracking_data(
        state: TrackingState,
        error: Option<&dyn Error>,
    ) -> Option<TrackingData> {
        if !state.tracking {
            return None;
        }
        tracing::debug!(tracking_state = ?state, "Preparing tracking data");

        let mut data = state.tracking_data;
        if let Some(custom) = state.custom_tracking_data {
            merge_custom_data(&mut data, custom);
        }
        if let Some(err) = error {
            data.insert("ca".into(), json!(1));
            data.insert("cra".into(), json!(format!("{:?}", err)));
        }

        if let Some(cvar) = data.shift_remove("cvar") {
            data.insert("cvar".into(), Value::String(cvar.to_string()));
        }

        Some(data)
    }
}

/// Accept the collector URL with or without the filename and trailing slash.
fn normalize_matomo_url(url: &str) -> String {
    if KNOWN_ENDPOINTS.iter().any(|endpoint| url.ends_with(endpoint)) {
        url.to_string()
    } else {
        format!("{}{}", url.trim_matches('/'), DEFAULT_ENDPOINT)
    }
}
