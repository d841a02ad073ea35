//! Destinations for finished tracking payloads.

use tokio::sync::mpsc;

use crate::tracking::{tracking_url, TrackingData};

/// Receives every payload produced by the middleware.
///
/// Delivery to the collector (and any retrying) belongs to the implementor.
/// `submit` runs inline on the request path, so it should hand off quickly.
pub trait PayloadSink: Send + Sync {
    fn submit(&self, matomo_url: &str, payload: TrackingData);
}

impl<F> PayloadSink for F
where
    F: Fn(&str, TrackingData) + Send + Sync,
{
    fn submit(&self, matomo_url: &str, payload: TrackingData) {
        self(matomo_url, payload)
    }
}

/// Logs the tracking URL instead of sending it.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl PayloadSink for LogSink {
    fn submit(&self, matomo_url: &str, payload: TrackingData) {
        match tracking_url(matomo_url, &payload) {
            Ok(url) => tracing::info!(url = %url, "Tracking request"),
            Err(e) => tracing::error!(matomo_url = %matomo_url, error = %e, "Invalid collector URL"),
        }
    }
}

/// A payload together with its destination.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingRequest {
    pub matomo_url: String,
    pub payload: TrackingData,
}

/// Queues payloads for a sender task owned by the host.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<TrackingRequest>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TrackingRequest>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl PayloadSink for ChannelSink {
    fn submit(&self, matomo_url: &str, payload: TrackingData) {
        let request = TrackingRequest {
            matomo_url: matomo_url.to_string(),
            payload,
        };
        if self.tx.send(request).is_err() {
            tracing::warn!("Tracking receiver dropped, discarding payload");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    fn payload() -> TrackingData {
        let mut data = TrackingData::new();
        data.insert("idsite".into(), json!("1"));
        data
    }

    #[test]
    fn test_channel_sink_delivers() {
        let (sink, mut rx) = ChannelSink::new();
        sink.submit("https://example.com/matomo.php", payload());

        let request = rx.try_recv().unwrap();
        assert_eq!(request.matomo_url, "https://example.com/matomo.php");
        assert_eq!(request.payload, payload());
    }

    #[test]
    fn test_channel_sink_survives_closed_receiver() {
        let (sink, rx) = ChannelSink::new();
        drop(rx);
        sink.submit("https://example.com/matomo.php", payload());
    }

    #[test]
    fn test_closure_sink() {
        let seen = Mutex::new(Vec::new());
        let sink = |url: &str, data: TrackingData| {
            seen.lock().unwrap().push((url.to_string(), data));
        };
        sink.submit("u", payload());
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_log_sink_accepts_bad_url() {
        LogSink.submit("not a url", payload());
    }
}
