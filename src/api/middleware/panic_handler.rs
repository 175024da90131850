//! Last-resort exception backstop.
//!
//! Anything that escapes typed failure handling (a panic in a handler or
//! layer) is converted to a generic `Unknown` failure with status 500.
//! The panic payload is logged in-process and never serialized to the
//! client.

use std::any::Any;

use axum::response::{IntoResponse, Response};

use crate::errors::Failure;

/// Panic responder for `tower_http::catch_panic::CatchPanicLayer::custom`.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "non-string panic payload"
    };

    tracing::error!(panic = %detail, "unhandled panic while serving request");

    Failure::unknown("An unexpected error occurred").into_response()
}
