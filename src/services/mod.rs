//! Business logic services

pub mod accounts;
pub mod catalog;
pub mod redis;
pub mod sessions;

use std::sync::Arc;

use crate::{config::SessionConfig, repository::Repository};

use sessions::{SessionService, SessionStore};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub accounts: accounts::AccountsService,
    pub catalog: catalog::CatalogService,
    pub sessions: SessionService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository and session store
    pub fn new(
        repository: Repository,
        session_store: Arc<dyn SessionStore>,
        session_config: &SessionConfig,
    ) -> Self {
        let sessions = SessionService::new(session_store, session_config.ttl_seconds);

        Self {
            accounts: accounts::AccountsService::new(repository.clone(), sessions.clone()),
            catalog: catalog::CatalogService::new(repository.clone()),
            sessions,
            repository,
        }
    }

    /// Whether the database answers
    pub async fn ready(&self) -> crate::error::AppResult<()> {
        self.repository.ping().await
    }
}
