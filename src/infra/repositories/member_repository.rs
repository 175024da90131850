//! Member repository - data access for the members table.
//!
//! Expected conditions never escape as raw database errors: every `DbErr`
//! is converted to a typed [`Failure`] at this boundary, keeping the
//! original error attached for logging only.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::entities::member::{ActiveModel, Column, Entity as MemberEntity};
use crate::domain::{CreateMember, Member, UpdateMember};
use crate::errors::{ApiResult, Failure};
use crate::infra::cache::{member_page_key, member_page_pattern, Cache};
use crate::types::{CursorPage, CursorToken, OffsetPage, PageParams};

/// Member data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Insert a new member; the store assigns id and sequence number.
    async fn insert(&self, data: CreateMember, actor: &str) -> ApiResult<Member>;

    /// Find member by primary key.
    async fn find_by_id(&self, id: Uuid) -> ApiResult<Option<Member>>;

    /// Find member by unique email.
    async fn find_by_email(&self, email: &str) -> ApiResult<Option<Member>>;

    /// Update name/age of an existing member.
    async fn update(&self, id: Uuid, data: UpdateMember, actor: &str) -> ApiResult<Member>;

    /// Delete member by primary key.
    async fn delete(&self, id: Uuid) -> ApiResult<()>;

    /// Fetch one offset page, ordered by sequence number.
    async fn list_offset(&self, params: PageParams) -> ApiResult<OffsetPage<Member>>;

    /// Fetch one cursor page strictly after the given continuation point.
    async fn list_cursor(
        &self,
        page_size: u64,
        after: Option<CursorToken>,
    ) -> ApiResult<CursorPage<Member>>;
}

/// Cached form of an offset page. Derived page flags are recomputed when
/// the page is rebuilt, so only the raw bookkeeping is stored.
#[derive(Debug, Serialize, Deserialize)]
struct CachedPage {
    items: Vec<Member>,
    page_index: u64,
    page_size: u64,
    total_count: u64,
}

impl From<&OffsetPage<Member>> for CachedPage {
    fn from(page: &OffsetPage<Member>) -> Self {
        Self {
            items: page.items.clone(),
            page_index: page.page_index,
            page_size: page.page_size,
            total_count: page.total_count,
        }
    }
}

impl From<CachedPage> for OffsetPage<Member> {
    fn from(cached: CachedPage) -> Self {
        OffsetPage::new(
            cached.items,
            cached.page_index,
            cached.page_size,
            cached.total_count,
        )
    }
}

/// SeaORM-backed member repository with an advisory Redis page cache.
pub struct MemberStore {
    db: DatabaseConnection,
    cache: Option<Cache>,
    page_ttl_seconds: u64,
}

impl MemberStore {
    pub fn new(db: DatabaseConnection, cache: Option<Cache>, page_ttl_seconds: u64) -> Self {
        Self {
            db,
            cache,
            page_ttl_seconds,
        }
    }

    /// Look up a cached page. Cache errors degrade to a miss.
    async fn cached_page(&self, key: &str) -> Option<OffsetPage<Member>> {
        let cache = self.cache.as_ref()?;
        match cache.get::<CachedPage>(key).await {
            Ok(hit) => hit.map(OffsetPage::from),
            Err(e) => {
                tracing::warn!(key, error = %e, "page cache read failed, falling back to store");
                None
            }
        }
    }

    /// Populate the page cache. Awaited so a write is never abandoned
    /// mid-flight; errors are logged and swallowed.
    async fn store_page(&self, key: &str, page: &OffsetPage<Member>) {
        if let Some(cache) = &self.cache {
            let cached = CachedPage::from(page);
            if let Err(e) = cache.set_with_ttl(key, &cached, self.page_ttl_seconds).await {
                tracing::warn!(key, error = %e, "page cache write failed");
            }
        }
    }

    /// Drop all cached member pages after a write.
    async fn invalidate_pages(&self) {
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.delete_pattern(&member_page_pattern()).await {
                tracing::warn!(error = %e, "page cache invalidation failed");
            }
        }
    }
}

#[async_trait]
impl MemberRepository for MemberStore {
    async fn insert(&self, data: CreateMember, actor: &str) -> ApiResult<Member> {
        let now = chrono::Utc::now();
        let active = ActiveModel {
            id: Set(Uuid::new_v4()),
            // seq stays NotSet: the store assigns the next BIGSERIAL value
            email: Set(data.email),
            name: Set(data.name),
            age: Set(data.age),
            created_at: Set(now),
            created_by: Set(actor.to_string()),
            changed_at: Set(now),
            changed_by: Set(actor.to_string()),
            ..Default::default()
        };

        let model = active.insert(&self.db).await.map_err(Failure::from)?;
        self.invalidate_pages().await;

        Ok(Member::from(model))
    }

    async fn find_by_id(&self, id: Uuid) -> ApiResult<Option<Member>> {
        let result = MemberEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(Failure::from)?;

        Ok(result.map(Member::from))
    }

    async fn find_by_email(&self, email: &str) -> ApiResult<Option<Member>> {
        let result = MemberEntity::find()
            .filter(Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(Failure::from)?;

        Ok(result.map(Member::from))
    }

    async fn update(&self, id: Uuid, data: UpdateMember, actor: &str) -> ApiResult<Member> {
        let model = MemberEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(Failure::from)?
            .ok_or_else(|| Failure::not_found("Member not found"))?;

        let mut active: ActiveModel = model.into();
        if let Some(name) = data.name {
            active.name = Set(name);
        }
        if let Some(age) = data.age {
            active.age = Set(Some(age));
        }
        active.changed_at = Set(chrono::Utc::now());
        active.changed_by = Set(actor.to_string());

        let model = active.update(&self.db).await.map_err(Failure::from)?;
        self.invalidate_pages().await;

        Ok(Member::from(model))
    }

    async fn delete(&self, id: Uuid) -> ApiResult<()> {
        let result = MemberEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(Failure::from)?;

        if result.rows_affected == 0 {
            return Err(Failure::not_found("Member not found"));
        }

        self.invalidate_pages().await;
        Ok(())
    }

    async fn list_offset(&self, params: PageParams) -> ApiResult<OffsetPage<Member>> {
        let key = member_page_key(params.page_index, params.page_size);

        if !params.no_cache {
            if let Some(page) = self.cached_page(&key).await {
                tracing::debug!(key, "member page served from cache");
                return Ok(page);
            }
        }

        let total_count = MemberEntity::find()
            .count(&self.db)
            .await
            .map_err(Failure::from)?;

        let models = MemberEntity::find()
            .order_by_asc(Column::Seq)
            .offset(params.offset())
            .limit(params.page_size)
            .all(&self.db)
            .await
            .map_err(Failure::from)?;

        let page = OffsetPage::new(
            models.into_iter().map(Member::from).collect(),
            params.page_index,
            params.page_size,
            total_count,
        );

        if !params.no_cache {
            self.store_page(&key, &page).await;
        }

        Ok(page)
    }

    async fn list_cursor(
        &self,
        page_size: u64,
        after: Option<CursorToken>,
    ) -> ApiResult<CursorPage<Member>> {
        let mut query = MemberEntity::find();
        if let Some(token) = after {
            query = query.filter(Column::Seq.gt(token.seq));
        }

        // One extra row tells us whether a further page exists
        let models = query
            .order_by_asc(Column::Seq)
            .limit(page_size + 1)
            .all(&self.db)
            .await
            .map_err(Failure::from)?;

        let rows: Vec<Member> = models.into_iter().map(Member::from).collect();
        Ok(CursorPage::from_rows(rows, page_size, |m| {
            CursorToken::new(m.id, m.seq)
        }))
    }
}
