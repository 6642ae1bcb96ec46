//! Redis-backed session storage

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client};

use crate::{
    error::{AppError, AppResult},
    models::session::SessionData,
};

use super::sessions::SessionStore;

#[derive(Clone)]
pub struct RedisSessionStore {
    conn: ConnectionManager,
}

impl RedisSessionStore {
    /// Connect and check the server answers PING
    pub async fn new(url: &str) -> AppResult<Self> {
        let client = Client::open(url)
            .map_err(|e| AppError::Session(format!("Failed to create Redis client: {}", e)))?;

        let mut conn = ConnectionManager::new(client)
            .await
            .map_err(|e| AppError::Session(format!("Failed to connect to Redis: {}", e)))?;

        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await
            .map_err(|e| AppError::Session(format!("Redis connection test failed: {}", e)))?;

        Ok(Self { conn })
    }

    fn key(session_key: &str) -> String {
        format!("session:{}", session_key)
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn load(&self, key: &str) -> AppResult<Option<SessionData>> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn
            .get(Self::key(key))
            .await
            .map_err(|e| AppError::Session(format!("Failed to read session from Redis: {}", e)))?;

        match raw {
            Some(raw) => {
                let data = serde_json::from_str(&raw)
                    .map_err(|e| AppError::Session(format!("Corrupt session record: {}", e)))?;
                Ok(Some(data))
            }
            None => Ok(None),
        }
    }

    async fn save(&self, key: &str, data: &SessionData, ttl_seconds: u64) -> AppResult<()> {
        let raw = serde_json::to_string(data)
            .map_err(|e| AppError::Session(format!("Failed to serialize session: {}", e)))?;

        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(Self::key(key), raw, ttl_seconds)
            .await
            .map_err(|e| AppError::Session(format!("Failed to store session in Redis: {}", e)))?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(Self::key(key))
            .await
            .map_err(|e| AppError::Session(format!("Failed to delete session from Redis: {}", e)))?;
        Ok(())
    }
}
