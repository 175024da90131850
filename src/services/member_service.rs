//! Member service - business rules and orchestration for member use cases.
//!
//! Each request is a single-shot validate, delegate, respond flow.
//! Validation and business-rule checks run before any write; repository
//! failures pass through unchanged.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{CreateMember, Member, UpdateMember};
use crate::errors::{ApiResult, Failure, OptionExt};
use crate::types::{CursorPage, CursorToken, OffsetPage, PageParams};

/// Member service trait for dependency injection.
#[async_trait]
pub trait MemberService: Send + Sync {
    /// Create a member; rejects duplicate emails before touching the store.
    async fn create_member(&self, data: CreateMember, actor: &str) -> ApiResult<Member>;

    /// Get member by ID.
    async fn get_member(&self, id: Uuid) -> ApiResult<Member>;

    /// Update member details.
    async fn update_member(&self, id: Uuid, data: UpdateMember, actor: &str) -> ApiResult<Member>;

    /// Delete member.
    async fn delete_member(&self, id: Uuid) -> ApiResult<()>;

    /// List one offset page of members.
    async fn list_members(&self, params: PageParams) -> ApiResult<OffsetPage<Member>>;

    /// List one cursor page of members; `token` is the opaque wire form.
    async fn list_members_cursor(
        &self,
        page_size: u64,
        token: Option<String>,
    ) -> ApiResult<CursorPage<Member>>;
}

/// Concrete implementation of MemberService backed by a repository.
pub struct MemberManager<R> {
    repo: Arc<R>,
}

impl<R> MemberManager<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<R: crate::infra::MemberRepository> MemberService for MemberManager<R> {
    async fn create_member(&self, data: CreateMember, actor: &str) -> ApiResult<Member> {
        if let Some(existing) = self.repo.find_by_email(&data.email).await? {
            return Err(Failure::duplicate_email("Email already registered").with_data(
                serde_json::json!({ "id": existing.id, "email": existing.email }),
            ));
        }

        self.repo.insert(data, actor).await
    }

    async fn get_member(&self, id: Uuid) -> ApiResult<Member> {
        self.repo.find_by_id(id).await?.ok_or_not_found()
    }

    async fn update_member(&self, id: Uuid, data: UpdateMember, actor: &str) -> ApiResult<Member> {
        self.repo.update(id, data, actor).await
    }

    async fn delete_member(&self, id: Uuid) -> ApiResult<()> {
        self.repo.delete(id).await
    }

    async fn list_members(&self, params: PageParams) -> ApiResult<OffsetPage<Member>> {
        params.validate()?;
        self.repo.list_offset(params).await
    }

    async fn list_members_cursor(
        &self,
        page_size: u64,
        token: Option<String>,
    ) -> ApiResult<CursorPage<Member>> {
        // Same size bounds as offset pages; cursor pages bypass the cache
        PageParams::new(0, page_size, true).validate()?;

        // Decode before any data access; corrupt tokens fail here, never
        // silently restarting from the first page
        let after = token.as_deref().map(CursorToken::decode).transpose()?;

        self.repo.list_cursor(page_size, after).await
    }
}
