//! Wire encoding of finished payloads.
//!
//! Matomo takes the payload as a query string (GET) or as a form-encoded
//! body (POST). Sending it is left to the host application.

use serde_json::Value;
use url::{form_urlencoded, Url};

use crate::tracking::state::TrackingData;

/// Form-encode a payload in its field order.
pub fn encode_payload(payload: &TrackingData) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in payload {
        serializer.append_pair(key, &field_text(value));
    }
    serializer.finish()
}

/// Collector URL carrying the payload as its query string.
pub fn tracking_url(matomo_url: &str, payload: &TrackingData) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(matomo_url)?;
    url.set_query(Some(&encode_payload(payload)));
    Ok(url)
}

fn field_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
