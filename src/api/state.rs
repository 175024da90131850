//! Application state - Dependency injection container.

use std::sync::Arc;

use axum::extract::FromRef;

use crate::config::Config;
use crate::infra::{Cache, Database, MemberStore};
use crate::services::{MemberManager, MemberService};

/// Application state containing all services.
#[derive(Clone)]
pub struct AppState {
    /// Member service
    pub member_service: Arc<dyn MemberService>,
    /// Redis cache
    pub cache: Arc<Cache>,
    /// Database connection
    pub database: Arc<Database>,
}

impl AppState {
    /// Wire the default service stack from connected infrastructure.
    pub fn from_config(database: Arc<Database>, cache: Arc<Cache>, config: &Config) -> Self {
        let repo = Arc::new(MemberStore::new(
            database.get_connection(),
            Some(cache.as_ref().clone()),
            config.page_cache_ttl_seconds,
        ));
        let member_service = Arc::new(MemberManager::new(repo));

        Self {
            member_service,
            cache,
            database,
        }
    }
}

// Member handlers only depend on the service abstraction, which keeps
// them testable against a bare Arc<dyn MemberService> state.
impl FromRef<AppState> for Arc<dyn MemberService> {
    fn from_ref(state: &AppState) -> Self {
        state.member_service.clone()
    }
}
