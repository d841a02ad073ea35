//! Response-side tracking input.
//!
//! # Responsibilities
//! - Let handlers attach extra tracking fields to their response
//! - Let handlers report a failure to be recorded as a caught error
//!
//! # Design Decisions
//! - Both travel as response extensions, so handlers stay framework-plain
//! - Both implement `IntoResponseParts` and compose in handler tuples

use axum::response::{IntoResponseParts, ResponseParts};
use std::convert::Infallible;
use thiserror::Error;

use crate::tracking::TrackingData;

/// Fields merged into the payload of the current request.
///
/// A `cvar` object is merged into the request's custom variables instead of
/// replacing them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomTrackingData(pub TrackingData);

impl IntoResponseParts for CustomTrackingData {
    type Error = Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        res.extensions_mut().insert(self);
        Ok(res)
    }
}

/// Error raised while handling the request, reported as `ca`/`cra`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct RequestFailure {
    pub message: String,
}

impl RequestFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl IntoResponseParts for RequestFailure {
    type Error = Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        res.extensions_mut().insert(self);
        Ok(res)
    }
}
