//! Integration tests for the member API endpoints.
//!
//! These tests mount the member routes on a mock service, so the full
//! HTTP surface (extractors, trace middleware, status mapping, envelope
//! shape) is exercised without a database or Redis connection.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware, Router,
};
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use jobbank_api::api::handlers::member_routes;
use jobbank_api::api::middleware::trace_context_middleware;
use jobbank_api::api::with_middleware;
use jobbank_api::config::{HEADER_NEXT_PAGE_TOKEN, HEADER_PAGE_SIZE, HEADER_TRACE_ID};
use jobbank_api::domain::{CreateMember, Member, UpdateMember};
use jobbank_api::errors::{ApiResult, Failure};
use jobbank_api::services::MemberService;
use jobbank_api::types::{CursorPage, CursorToken, OffsetPage, PageParams};

// =============================================================================
// Mock Service
// =============================================================================

/// Mock member service backed by a fixed in-memory roster.
///
/// `taken_email` simulates a pre-existing registration for the
/// duplicate-email tests.
#[derive(Default)]
struct MockMemberService {
    members: Vec<Member>,
    taken_email: Option<String>,
}

fn test_member(seq: i64, email: &str) -> Member {
    Member {
        id: Uuid::new_v4(),
        seq,
        email: email.to_string(),
        name: "Test Member".to_string(),
        age: Some(30),
        created_at: Utc::now(),
        created_by: "tester".to_string(),
        changed_at: Utc::now(),
        changed_by: "tester".to_string(),
    }
}

#[async_trait]
impl MemberService for MockMemberService {
    async fn create_member(&self, data: CreateMember, actor: &str) -> ApiResult<Member> {
        if self.taken_email.as_deref() == Some(data.email.as_str()) {
            return Err(Failure::duplicate_email("Email already registered"));
        }
        let mut member = test_member(1, &data.email);
        member.name = data.name;
        member.age = data.age;
        member.created_by = actor.to_string();
        Ok(member)
    }

    async fn get_member(&self, id: Uuid) -> ApiResult<Member> {
        self.members
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| Failure::not_found("Member not found"))
    }

    async fn update_member(&self, id: Uuid, data: UpdateMember, _actor: &str) -> ApiResult<Member> {
        let mut member = self.get_member(id).await?;
        if let Some(name) = data.name {
            member.name = name;
        }
        if let Some(age) = data.age {
            member.age = Some(age);
        }
        Ok(member)
    }

    async fn delete_member(&self, id: Uuid) -> ApiResult<()> {
        self.get_member(id).await.map(|_| ())
    }

    async fn list_members(&self, params: PageParams) -> ApiResult<OffsetPage<Member>> {
        params.validate()?;
        let start = (params.offset() as usize).min(self.members.len());
        let end = (start + params.page_size as usize).min(self.members.len());
        Ok(OffsetPage::new(
            self.members[start..end].to_vec(),
            params.page_index,
            params.page_size,
            self.members.len() as u64,
        ))
    }

    async fn list_members_cursor(
        &self,
        page_size: u64,
        token: Option<String>,
    ) -> ApiResult<CursorPage<Member>> {
        PageParams::new(0, page_size, true).validate()?;
        let after = token.as_deref().map(CursorToken::decode).transpose()?;

        let min_seq = after.map(|t| t.seq).unwrap_or(i64::MIN);
        let rows: Vec<Member> = self
            .members
            .iter()
            .filter(|m| m.seq > min_seq)
            .take(page_size as usize + 1)
            .cloned()
            .collect();

        Ok(CursorPage::from_rows(rows, page_size, |m| {
            CursorToken::new(m.id, m.seq)
        }))
    }
}

// =============================================================================
// Test Helpers
// =============================================================================

fn test_app(service: MockMemberService) -> Router {
    let service: Arc<dyn MemberService> = Arc::new(service);
    Router::new()
        .nest("/members", member_routes())
        .layer(middleware::from_fn(trace_context_middleware))
        .with_state(service)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn create_member_returns_201_with_location() {
    let app = test_app(MockMemberService::default());

    let response = app
        .oneshot(post_json(
            "/members",
            serde_json::json!({ "email": "new@example.com", "name": "New Member", "age": 28 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response.headers()["location"].to_str().unwrap().to_string();
    assert!(location.starts_with("/members/"));

    let body = body_json(response).await;
    assert_eq!(body["email"], "new@example.com");
    assert_eq!(body["name"], "New Member");
    // The sequence number is internal and never leaves the API
    assert!(body.get("seq").is_none());
}

#[tokio::test]
async fn duplicate_email_maps_to_409_with_code() {
    let app = test_app(MockMemberService {
        taken_email: Some("taken@example.com".to_string()),
        ..Default::default()
    });

    let response = app
        .oneshot(post_json(
            "/members",
            serde_json::json!({ "email": "taken@example.com", "name": "Someone" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["code"], "DuplicateEmail");
    assert!(body["traceId"].as_str().is_some());
}

#[tokio::test]
async fn invalid_email_is_rejected_before_the_service() {
    let app = test_app(MockMemberService {
        // Would conflict if the request reached the service
        taken_email: Some("not-an-email".to_string()),
        ..Default::default()
    });

    let response = app
        .oneshot(post_json(
            "/members",
            serde_json::json!({ "email": "not-an-email", "name": "Someone" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "ValidationError");
}

// =============================================================================
// Offset pagination
// =============================================================================

#[tokio::test]
async fn empty_store_yields_an_empty_first_page() {
    let app = test_app(MockMemberService::default());

    let response = app.oneshot(get("/members")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 0);
    assert_eq!(body["totalCount"], 0);
    assert_eq!(body["totalPages"], 0);
    assert_eq!(body["hasPreviousPage"], false);
    assert_eq!(body["hasNextPage"], false);
}

#[tokio::test]
async fn page_flags_are_derived_from_position() {
    let members = (1..=25).map(|i| test_member(i, "m@example.com")).collect();
    let app = test_app(MockMemberService {
        members,
        ..Default::default()
    });

    let response = app
        .oneshot(
            Request::get("/members")
                .header("x-page-index", "1")
                .header(HEADER_PAGE_SIZE, "10")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 10);
    assert_eq!(body["totalCount"], 25);
    assert_eq!(body["totalPages"], 3);
    assert_eq!(body["hasPreviousPage"], true);
    assert_eq!(body["hasNextPage"], true);
}

#[tokio::test]
async fn out_of_range_page_size_is_a_validation_error() {
    let app = test_app(MockMemberService::default());

    let response = app
        .oneshot(
            Request::get("/members")
                .header(HEADER_PAGE_SIZE, "101")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "ValidationError");
}

#[tokio::test]
async fn non_numeric_page_header_is_a_validation_error() {
    let app = test_app(MockMemberService::default());

    let response = app
        .oneshot(
            Request::get("/members")
                .header("x-page-index", "three")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Cursor pagination
// =============================================================================

#[tokio::test]
async fn cursor_page_carries_a_continuation_token() {
    let members = (1..=5).map(|i| test_member(i, "m@example.com")).collect();
    let app = test_app(MockMemberService {
        members,
        ..Default::default()
    });

    let response = app
        .oneshot(
            Request::get("/members/cursor")
                .header(HEADER_PAGE_SIZE, "2")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["hasNextPage"], true);

    // The token resumes after the last returned row
    let token = body["nextPageToken"].as_str().unwrap();
    let decoded = CursorToken::decode(token).unwrap();
    assert_eq!(decoded.seq, 2);
}

#[tokio::test]
async fn cursor_stream_ends_without_a_token() {
    let members = (1..=3).map(|i| test_member(i, "m@example.com")).collect();
    let app = test_app(MockMemberService {
        members,
        ..Default::default()
    });

    let response = app
        .oneshot(
            Request::get("/members/cursor")
                .header(HEADER_PAGE_SIZE, "10")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 3);
    assert_eq!(body["hasNextPage"], false);
    assert!(body["nextPageToken"].is_null());
}

#[tokio::test]
async fn malformed_page_token_maps_to_400() {
    let app = test_app(MockMemberService::default());

    let response = app
        .oneshot(
            Request::get("/members/cursor")
                .header(HEADER_NEXT_PAGE_TOKEN, "%%corrupt%%")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "ValidationError");
    assert_eq!(body["message"], "Invalid page token");
}

// =============================================================================
// Read / update / delete
// =============================================================================

#[tokio::test]
async fn missing_member_maps_to_404() {
    let app = test_app(MockMemberService::default());

    let response = app
        .oneshot(get(&format!("/members/{}", Uuid::new_v4())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["code"], "NotFound");
}

#[tokio::test]
async fn delete_returns_204_with_empty_body() {
    let member = test_member(1, "m@example.com");
    let id = member.id;
    let app = test_app(MockMemberService {
        members: vec![member],
        ..Default::default()
    });

    let response = app
        .oneshot(
            Request::delete(&format!("/members/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(bytes.is_empty());
}

#[tokio::test]
async fn update_returns_the_changed_member() {
    let member = test_member(1, "m@example.com");
    let id = member.id;
    let app = test_app(MockMemberService {
        members: vec![member],
        ..Default::default()
    });

    let response = app
        .oneshot(
            Request::put(&format!("/members/{}", id))
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::json!({ "name": "Renamed", "age": 31 }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["name"], "Renamed");
    assert_eq!(body["age"], 31);
}

// =============================================================================
// Trace propagation
// =============================================================================

#[tokio::test]
async fn client_trace_id_is_echoed_on_responses() {
    let app = test_app(MockMemberService::default());

    let response = app
        .oneshot(
            Request::get("/members")
                .header(HEADER_TRACE_ID, "trace-abc-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers()[HEADER_TRACE_ID].to_str().unwrap(),
        "trace-abc-123"
    );
}

#[tokio::test]
async fn failures_carry_the_request_trace_id() {
    let app = test_app(MockMemberService::default());

    let response = app
        .oneshot(
            Request::get(&format!("/members/{}", Uuid::new_v4()))
                .header(HEADER_TRACE_ID, "trace-xyz-789")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["traceId"], "trace-xyz-789");
}

#[tokio::test]
async fn a_trace_id_is_generated_when_none_is_sent() {
    let app = test_app(MockMemberService::default());

    let response = app.oneshot(get("/members")).await.unwrap();

    let trace = response.headers()[HEADER_TRACE_ID].to_str().unwrap();
    assert!(!trace.is_empty());
}

#[tokio::test]
async fn panicked_request_still_carries_its_trace_id() {
    // The full middleware stack, wrapped around a handler that panics
    async fn boom() -> () {
        panic!("handler blew up")
    }
    let app = with_middleware(Router::new().route("/boom", axum::routing::get(boom)));

    let response = app
        .oneshot(
            Request::get("/boom")
                .header(HEADER_TRACE_ID, "trace-panic-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.headers()[HEADER_TRACE_ID].to_str().unwrap(),
        "trace-panic-1"
    );
    let body = body_json(response).await;
    assert_eq!(body["code"], "Unknown");
}
