//! Server-side sessions
//!
//! A session key travels in a cookie; the record it points to lives in a
//! [`SessionStore`]. Handlers never read the store directly, they receive the
//! resolved [`Session`] through the extractors in `api`.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rand::{distributions::Alphanumeric, Rng};
use tokio::sync::RwLock;

use crate::{
    config::{AppConfig, SessionBackend},
    error::AppResult,
    models::session::{Session, SessionData},
};

use super::redis::RedisSessionStore;

pub const SESSION_KEY_LEN: usize = 32;

// About a century; keeps expiry arithmetic in range
const MAX_MEMORY_TTL_SECONDS: u64 = 100 * 365 * 24 * 3600;

/// Persistence for session records
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, key: &str) -> AppResult<Option<SessionData>>;
    async fn save(&self, key: &str, data: &SessionData, ttl_seconds: u64) -> AppResult<()>;
    async fn delete(&self, key: &str) -> AppResult<()>;
}

/// In-process store; records are lost on restart
#[derive(Default)]
pub struct MemorySessionStore {
    records: RwLock<HashMap<String, (SessionData, DateTime<Utc>)>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, key: &str) -> AppResult<Option<SessionData>> {
        let now = Utc::now();
        {
            let records = self.records.read().await;
            match records.get(key) {
                Some((data, expires_at)) if *expires_at > now => return Ok(Some(data.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }

        // expired
        self.records.write().await.remove(key);
        Ok(None)
    }

    async fn save(&self, key: &str, data: &SessionData, ttl_seconds: u64) -> AppResult<()> {
        let now = Utc::now();
        let ttl = ttl_seconds.min(MAX_MEMORY_TTL_SECONDS) as i64;
        let expires_at = now + Duration::seconds(ttl);

        let mut records = self.records.write().await;
        records.retain(|_, (_, expiry)| *expiry > now);
        records.insert(key.to_string(), (data.clone(), expires_at));
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.records.write().await.remove(key);
        Ok(())
    }
}

/// Build the store selected by `session.backend`
pub async fn connect_store(config: &AppConfig) -> AppResult<Arc<dyn SessionStore>> {
    match config.session.backend {
        SessionBackend::Redis => {
            let store = RedisSessionStore::new(&config.redis.url).await?;
            tracing::info!("Session store: redis");
            Ok(Arc::new(store))
        }
        SessionBackend::Memory => {
            tracing::warn!("Session store: memory (sessions are lost on restart)");
            Ok(Arc::new(MemorySessionStore::new()))
        }
    }
}

#[derive(Clone)]
pub struct SessionService {
    store: Arc<dyn SessionStore>,
    ttl_seconds: u64,
}

impl SessionService {
    pub fn new(store: Arc<dyn SessionStore>, ttl_seconds: u64) -> Self {
        Self { store, ttl_seconds }
    }

    /// Store a new record under a fresh key and return the key
    pub async fn start(&self, data: SessionData) -> AppResult<String> {
        let key = generate_key();
        self.store.save(&key, &data, self.ttl_seconds).await?;
        Ok(key)
    }

    /// Look up the record for a cookie value
    pub async fn resolve(&self, key: &str) -> AppResult<Option<Session>> {
        if !is_well_formed(key) {
            return Ok(None);
        }

        Ok(self.store.load(key).await?.map(|data| Session {
            key: key.to_string(),
            data,
        }))
    }

    pub async fn end(&self, key: &str) -> AppResult<()> {
        if !is_well_formed(key) {
            return Ok(());
        }
        self.store.delete(key).await
    }
}

fn generate_key() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_KEY_LEN)
        .map(char::from)
        .collect()
}

fn is_well_formed(key: &str) -> bool {
    key.len() == SESSION_KEY_LEN && key.bytes().all(|b| b.is_ascii_alphanumeric())
}
