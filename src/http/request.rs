//! Request metadata extraction.
//!
//! # Responsibilities
//! - Pull tracking-relevant fields out of an axum request
//! - Resolve the matched route pattern and the client address
//! - Rebuild the full request URL from `Host` when the URI is relative
//!
//! # Design Decisions
//! - Values are copied out so the request can move on to the handler
//! - Only the first `X-Forwarded-For` entry (the client) is kept
//! - Non-UTF-8 header values are treated as absent

use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::{ConnectInfo, MatchedPath},
    http::{header, HeaderMap, Request},
};

use crate::tracking::RequestInfo;

pub const X_FORWARDED_FOR: &str = "x-forwarded-for";
pub const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Owned copy of the request fields the tracker needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestMetadata {
    pub user_agent: String,
    pub request_path: String,
    pub request_url: String,
    pub method: String,
    pub remote_addr: Option<String>,
    pub url_rule: String,
    pub referrer: Option<String>,
    pub forwarded_for: Option<String>,
    pub lang: Option<String>,
}

impl RequestMetadata {
    pub fn from_request(req: &Request<Body>) -> Self {
        let headers = req.headers();
        let uri = req.uri();

        let request_url = if uri.scheme().is_some() {
            uri.to_string()
        } else {
            let scheme = header_str(headers, X_FORWARDED_PROTO).unwrap_or("http");
            let host = header_str(headers, header::HOST.as_str()).unwrap_or("localhost");
            format!("{}://{}{}", scheme, host, uri)
        };

        Self {
            user_agent: header_str(headers, header::USER_AGENT.as_str())
                .unwrap_or_default()
                .to_string(),
            request_path: uri.path().to_string(),
            request_url,
            method: req.method().as_str().to_string(),
            remote_addr: req
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string()),
            url_rule: req
                .extensions()
                .get::<MatchedPath>()
                .map(|path| path.as_str().to_string())
                .unwrap_or_default(),
            referrer: header_str(headers, header::REFERER.as_str()).map(str::to_string),
            forwarded_for: header_str(headers, X_FORWARDED_FOR)
                .and_then(|v| v.split(',').next())
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string),
            lang: header_str(headers, header::ACCEPT_LANGUAGE.as_str()).map(str::to_string),
        }
    }

    /// Borrowed view handed to [`MatomoCore::build_tracking_state`](crate::tracking::MatomoCore::build_tracking_state).
    pub fn as_request_info(&self) -> RequestInfo<'_> {
        RequestInfo {
            user_agent: &self.user_agent,
            request_path: &self.request_path,
            request_url: &self.request_url,
            method: &self.method,
            remote_addr: self.remote_addr.as_deref(),
            url_rule: &self.url_rule,
            referrer: self.referrer.as_deref(),
            forwarded_for: self.forwarded_for.as_deref(),
            lang: self.lang.as_deref(),
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_request_headers() {
        let req = Request::builder()
            .method("POST")
            .uri("/items/42?x=1")
            .header("Host", "shop.example.com")
            .header("User-Agent", "Mozilla/5.0")
            .header("Referer", "https://ref.example.com/")
            .header("Accept-Language", "sv-SE,sv;q=0.9")
            .header("X-Forwarded-For", "203.0.113.9, 10.0.0.1")
            .header("X-Forwarded-Proto", "https")
            .body(Body::empty())
            .unwrap();

        let meta = RequestMetadata::from_request(&req);
        assert_eq!(meta.method, "POST");
        assert_eq!(meta.user_agent, "Mozilla/5.0");
        assert_eq!(meta.request_path, "/items/42");
        assert_eq!(meta.request_url, "https://shop.example.com/items/42?x=1");
        assert_eq!(meta.referrer.as_deref(), Some("https://ref.example.com/"));
        assert_eq!(meta.lang.as_deref(), Some("sv-SE,sv;q=0.9"));
        assert_eq!(meta.forwarded_for.as_deref(), Some("203.0.113.9"));
        // No router and no connect info in a bare request
        assert_eq!(meta.url_rule, "");
        assert!(meta.remote_addr.is_none());
    }

    #[test]
    fn test_connect_info_and_absolute_uri() {
        let mut req = Request::builder()
            .uri("http://example.com/a")
            .body(Body::empty())
            .unwrap();
        let addr: SocketAddr = "127.0.0.1:4000".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));

        let meta = RequestMetadata::from_request(&req);
        assert_eq!(meta.request_url, "http://example.com/a");
        assert_eq!(meta.remote_addr.as_deref(), Some("127.0.0.1"));

        let info = meta.as_request_info();
        assert_eq!(info.method, "GET");
        assert_eq!(info.user_agent, "");
        assert!(info.forwarded_for.is_none());
    }
}
