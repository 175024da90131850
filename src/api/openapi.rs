//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::OpenApi;

use crate::api::handlers::member_handler;
use crate::domain::{CreateMember, MemberResponse, UpdateMember};
use crate::errors::{FailureBody, FailureCode};

/// OpenAPI documentation for the job-bank member API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "JobBank Member API",
        version = "0.1.0",
        description = "Member CRUD with offset and cursor pagination and typed failure responses",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        member_handler::list_members,
        member_handler::list_members_cursor,
        member_handler::get_member,
        member_handler::create_member,
        member_handler::update_member,
        member_handler::delete_member,
    ),
    components(
        schemas(
            MemberResponse,
            CreateMember,
            UpdateMember,
            member_handler::CreateMemberRequest,
            member_handler::UpdateMemberRequest,
            FailureBody,
            FailureCode,
        )
    ),
    tags(
        (name = "Members", description = "Member management operations")
    )
)]
pub struct ApiDoc;
