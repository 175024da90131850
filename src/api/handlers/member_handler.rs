//! Member CRUD handlers.
//!
//! Each handler is a single-shot validate, delegate, respond flow: header
//! and body validation happen in the extractors, business rules in the
//! service, and the outcome converts to a transport response here. Failure
//! logging lives in middleware, not in these adapters.

use std::sync::Arc;

use axum::{
    extract::{FromRef, Path, State},
    response::Json,
    routing::get,
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::{CursorPageHeaders, OffsetPageHeaders, ValidatedJson};
use crate::api::middleware::TraceId;
use crate::domain::{CreateMember, MemberResponse, UpdateMember};
use crate::errors::ApiResult;
use crate::services::MemberService;
use crate::types::{Created, CursorPage, NoContent, OffsetPage};

/// Audit actor recorded on writes while the API carries no authentication.
const ANONYMOUS_ACTOR: &str = "anonymous";

/// Member creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateMemberRequest {
    /// Member email address (unique)
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "member@example.com")]
    pub email: String,
    /// Member display name
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "John Doe")]
    pub name: String,
    /// Member age
    #[validate(range(min = 0, max = 150, message = "Age must be between 0 and 150"))]
    #[schema(example = 30)]
    pub age: Option<i32>,
}

/// Member update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateMemberRequest {
    /// New display name
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Jane Doe")]
    pub name: Option<String>,
    /// New age
    #[validate(range(min = 0, max = 150, message = "Age must be between 0 and 150"))]
    #[schema(example = 31)]
    pub age: Option<i32>,
}

/// Create member routes.
///
/// Generic over the state type so tests can mount the routes on a bare
/// `Arc<dyn MemberService>`.
pub fn member_routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    Arc<dyn MemberService>: FromRef<S>,
{
    Router::new()
        .route("/", get(list_members).post(create_member))
        .route("/cursor", get(list_members_cursor))
        .route(
            "/:id",
            get(get_member).put(update_member).delete(delete_member),
        )
}

/// List members with offset pagination
#[utoipa::path(
    get,
    path = "/members",
    tag = "Members",
    params(
        ("x-page-index" = Option<u64>, Header, description = "Zero-based page index (default 0)"),
        ("x-page-size" = Option<u64>, Header, description = "Page size, 1-100 (default 10)"),
        ("cache-control" = Option<String>, Header, description = "`no-cache` bypasses the page cache")
    ),
    responses(
        (status = 200, description = "One page of members with derived page flags"),
        (status = 400, description = "Invalid pagination headers")
    )
)]
pub async fn list_members(
    State(service): State<Arc<dyn MemberService>>,
    Extension(trace_id): Extension<TraceId>,
    OffsetPageHeaders(params): OffsetPageHeaders,
) -> ApiResult<Json<OffsetPage<MemberResponse>>> {
    let page = service
        .list_members(params)
        .await
        .map_err(|e| e.or_trace_id(trace_id.as_str()))?;

    Ok(Json(page.map(MemberResponse::from)))
}

/// List members with cursor pagination
#[utoipa::path(
    get,
    path = "/members/cursor",
    tag = "Members",
    params(
        ("x-page-size" = Option<u64>, Header, description = "Page size, 1-100 (default 10)"),
        ("x-next-page-token" = Option<String>, Header, description = "Opaque continuation token from the previous page")
    ),
    responses(
        (status = 200, description = "One page of members and the next continuation token"),
        (status = 400, description = "Invalid page size or malformed token")
    )
)]
pub async fn list_members_cursor(
    State(service): State<Arc<dyn MemberService>>,
    Extension(trace_id): Extension<TraceId>,
    headers: CursorPageHeaders,
) -> ApiResult<Json<CursorPage<MemberResponse>>> {
    let page = service
        .list_members_cursor(headers.page_size, headers.token)
        .await
        .map_err(|e| e.or_trace_id(trace_id.as_str()))?;

    Ok(Json(page.map(MemberResponse::from)))
}

/// Get member by ID
#[utoipa::path(
    get,
    path = "/members/{id}",
    tag = "Members",
    params(("id" = Uuid, Path, description = "Member identifier")),
    responses(
        (status = 200, description = "Member found", body = MemberResponse),
        (status = 404, description = "Member not found")
    )
)]
pub async fn get_member(
    State(service): State<Arc<dyn MemberService>>,
    Extension(trace_id): Extension<TraceId>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MemberResponse>> {
    let member = service
        .get_member(id)
        .await
        .map_err(|e| e.or_trace_id(trace_id.as_str()))?;

    Ok(Json(MemberResponse::from(member)))
}

/// Create a new member
#[utoipa::path(
    post,
    path = "/members",
    tag = "Members",
    request_body = CreateMemberRequest,
    responses(
        (status = 201, description = "Member created", body = MemberResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn create_member(
    State(service): State<Arc<dyn MemberService>>,
    Extension(trace_id): Extension<TraceId>,
    ValidatedJson(payload): ValidatedJson<CreateMemberRequest>,
) -> ApiResult<Created<MemberResponse>> {
    let member = service
        .create_member(
            CreateMember {
                email: payload.email,
                name: payload.name,
                age: payload.age,
            },
            ANONYMOUS_ACTOR,
        )
        .await
        .map_err(|e| e.or_trace_id(trace_id.as_str()))?;

    let location = format!("/members/{}", member.id);
    Ok(Created::new(location, MemberResponse::from(member)))
}

/// Update member details
#[utoipa::path(
    put,
    path = "/members/{id}",
    tag = "Members",
    params(("id" = Uuid, Path, description = "Member identifier")),
    request_body = UpdateMemberRequest,
    responses(
        (status = 200, description = "Member updated", body = MemberResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Member not found")
    )
)]
pub async fn update_member(
    State(service): State<Arc<dyn MemberService>>,
    Extension(trace_id): Extension<TraceId>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateMemberRequest>,
) -> ApiResult<Json<MemberResponse>> {
    let member = service
        .update_member(
            id,
            UpdateMember {
                name: payload.name,
                age: payload.age,
            },
            ANONYMOUS_ACTOR,
        )
        .await
        .map_err(|e| e.or_trace_id(trace_id.as_str()))?;

    Ok(Json(MemberResponse::from(member)))
}

/// Delete member
#[utoipa::path(
    delete,
    path = "/members/{id}",
    tag = "Members",
    params(("id" = Uuid, Path, description = "Member identifier")),
    responses(
        (status = 204, description = "Member deleted"),
        (status = 404, description = "Member not found")
    )
)]
pub async fn delete_member(
    State(service): State<Arc<dyn MemberService>>,
    Extension(trace_id): Extension<TraceId>,
    Path(id): Path<Uuid>,
) -> ApiResult<NoContent> {
    service
        .delete_member(id)
        .await
        .map_err(|e| e.or_trace_id(trace_id.as_str()))?;

    Ok(NoContent)
}
