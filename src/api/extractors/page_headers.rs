//! Header-based pagination parameter extractors.
//!
//! Pagination state rides in request headers rather than the query string:
//! `x-page-index` and `x-page-size` for offset pages, `x-page-size` and
//! `x-next-page-token` for cursor pages, and `cache-control` to bypass the
//! page cache. Non-numeric values are explicit validation failures, not
//! silent defaults.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::CACHE_CONTROL, request::Parts, HeaderMap},
};

use crate::api::middleware::TraceId;
use crate::config::{
    DEFAULT_PAGE_INDEX, DEFAULT_PAGE_SIZE, HEADER_NEXT_PAGE_TOKEN, HEADER_PAGE_INDEX,
    HEADER_PAGE_SIZE,
};
use crate::errors::{ApiResult, Failure};
use crate::types::PageParams;

/// Correlate extractor rejections with the request's trace id.
fn attach_trace(failure: Failure, trace: Option<&TraceId>) -> Failure {
    match trace {
        Some(t) => failure.or_trace_id(t.as_str()),
        None => failure,
    }
}

fn header_u64(headers: &HeaderMap, name: &str, default: u64) -> ApiResult<u64> {
    match headers.get(name) {
        None => Ok(default),
        Some(value) => value
            .to_str()
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .ok_or_else(|| Failure::validation(format!("{name} must be a non-negative integer"))),
    }
}

/// The `cache-control` header disables the page cache when it carries
/// `no-cache` (or a literal `true`, which older clients send).
fn no_cache_requested(headers: &HeaderMap) -> bool {
    headers
        .get(CACHE_CONTROL)
        .and_then(|v| v.to_str().ok())
        .map(|v| {
            let v = v.trim().to_ascii_lowercase();
            v.contains("no-cache") || v == "true"
        })
        .unwrap_or(false)
}

/// Offset pagination parameters extracted from request headers.
///
/// Bounds are validated here, before any data access.
pub struct OffsetPageHeaders(pub PageParams);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for OffsetPageHeaders {
    type Rejection = Failure;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let trace = parts.extensions.get::<TraceId>().cloned();
        let headers = &parts.headers;

        let params = PageParams::new(
            header_u64(headers, HEADER_PAGE_INDEX, DEFAULT_PAGE_INDEX)
                .map_err(|f| attach_trace(f, trace.as_ref()))?,
            header_u64(headers, HEADER_PAGE_SIZE, DEFAULT_PAGE_SIZE)
                .map_err(|f| attach_trace(f, trace.as_ref()))?,
            no_cache_requested(headers),
        );
        params
            .validate()
            .map_err(|f| attach_trace(f, trace.as_ref()))?;

        Ok(Self(params))
    }
}

/// Cursor pagination parameters extracted from request headers.
///
/// The token stays in its opaque wire form here; decoding happens in the
/// service so malformed input is rejected before any data access.
pub struct CursorPageHeaders {
    pub page_size: u64,
    pub token: Option<String>,
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CursorPageHeaders {
    type Rejection = Failure;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let trace = parts.extensions.get::<TraceId>().cloned();
        let headers = &parts.headers;

        let page_size = header_u64(headers, HEADER_PAGE_SIZE, DEFAULT_PAGE_SIZE)
            .map_err(|f| attach_trace(f, trace.as_ref()))?;

        let token = headers
            .get(HEADER_NEXT_PAGE_TOKEN)
            .map(|v| {
                v.to_str()
                    .map(str::to_string)
                    .map_err(|_| Failure::validation("Invalid page token"))
            })
            .transpose()
            .map_err(|f| attach_trace(f, trace.as_ref()))?;

        Ok(Self { page_size, token })
    }
}
