//! Per-request trace context.
//!
//! Every request carries a correlation id: taken from the `x-trace-id`
//! header when the caller supplies one, freshly generated otherwise. The
//! id is available to handlers via request extensions, echoed on the
//! response, and attached to every failure envelope.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::config::HEADER_TRACE_ID;

/// Correlation id for the current request.
#[derive(Clone, Debug)]
pub struct TraceId(String);

impl TraceId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Install the trace id into request extensions and echo it back.
pub async fn trace_context_middleware(mut req: Request, next: Next) -> Response {
    let trace_id = req
        .headers()
        .get(HEADER_TRACE_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    req.extensions_mut().insert(TraceId(trace_id.clone()));

    let mut response = next.run(req).await;

    if let Ok(value) = HeaderValue::from_str(&trace_id) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(HEADER_TRACE_ID), value);
    }

    response
}
