use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use deadpool_redis::{redis::AsyncCommands, Pool};
use uuid::Uuid;

use crate::{entities::identity::Identity, errors::SessionError};

const SESSION_PREFIX: &str = "session";

/// Server-side sessions keyed by an opaque id.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Stores `identity` for `ttl` and returns the new session id.
    async fn create(&self, identity: &Identity, ttl: Duration) -> Result<String, SessionError>;

    /// `None` for unknown or expired sessions.
    async fn get(&self, session_id: &str) -> Result<Option<Identity>, SessionError>;

    async fn destroy(&self, session_id: &str) -> Result<(), SessionError>;

    async fn ping(&self) -> Result<(), SessionError>;
}

fn new_session_id() -> String {
    Uuid::new_v4().simple().to_string()
}

fn session_key(session_id: &str) -> String {
    format!("{}:{}", SESSION_PREFIX, session_id)
}

pub struct RedisSessionStore {
    pool: Pool,
}

impl RedisSessionStore {
    pub fn new(pool: Pool) -> Self {
        RedisSessionStore { pool }
    }

    pub fn from_url(url: &str) -> Result<Self, SessionError> {
        let pool = deadpool_redis::Config::from_url(url)
            .create_pool(Some(deadpool_redis::Runtime::Tokio1))
            .map_err(|e| SessionError::Unavailable(e.to_string()))?;
        Ok(RedisSessionStore::new(pool))
    }

    async fn connection(&self) -> Result<deadpool_redis::Connection, SessionError> {
        self.pool
            .get()
            .await
            .map_err(|e| SessionError::Unavailable(e.to_string()))
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn create(&self, identity: &Identity, ttl: Duration) -> Result<String, SessionError> {
        let session_id = new_session_id();
        let payload = serde_json::to_string(identity).map_err(|e| SessionError::Corrupt(e.to_string()))?;

        let mut conn = self.connection().await?;
        conn.set_ex::<_, _, ()>(session_key(&session_id), payload, ttl.as_secs().max(1))
            .await
            .map_err(|e| SessionError::Operation(e.to_string()))?;
        Ok(session_id)
    }

    async fn get(&self, session_id: &str) -> Result<Option<Identity>, SessionError> {
        let mut conn = self.connection().await?;
        let payload: Option<String> = conn
            .get(session_key(session_id))
            .await
            .map_err(|e| SessionError::Operation(e.to_string()))?;

        payload
            .map(|raw| serde_json::from_str(&raw).map_err(|e| SessionError::Corrupt(e.to_string())))
            .transpose()
    }

    async fn destroy(&self, session_id: &str) -> Result<(), SessionError> {
        let mut conn = self.connection().await?;
        conn.del::<_, ()>(session_key(session_id))
            .await
            .map_err(|e| SessionError::Operation(e.to_string()))
    }

    async fn ping(&self) -> Result<(), SessionError> {
        let mut conn = self.connection().await?;
        let pong: String = deadpool_redis::redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| SessionError::Operation(e.to_string()))?;
        match pong.as_str() {
            "PONG" => Ok(()),
            other => Err(SessionError::Operation(format!("unexpected ping reply: {}", other))),
        }
    }
}

/// Process-local sessions, used when no Redis URL is configured.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: DashMap<String, (Identity, Instant)>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, identity: &Identity, ttl: Duration) -> Result<String, SessionError> {
        let now = Instant::now();
        self.sessions.retain(|_, (_, expires)| *expires > now);

        let session_id = new_session_id();
        self.sessions.insert(session_id.clone(), (identity.clone(), now + ttl));
        Ok(session_id)
    }

    async fn get(&self, session_id: &str) -> Result<Option<Identity>, SessionError> {
        let now = Instant::now();
        self.sessions.remove_if(session_id, |_, (_, expires)| *expires <= now);
        Ok(self.sessions.get(session_id).map(|entry| entry.0.clone()))
    }

    async fn destroy(&self, session_id: &str) -> Result<(), SessionError> {
        self.sessions.remove(session_id);
        Ok(())
    }

    async fn ping(&self) -> Result<(), SessionError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> Identity {
        Identity { user_id: "admin".into(), email: "admin@example.com".into() }
    }

    #[tokio::test]
    async fn sessions_resolve_until_destroyed() {
        let store = MemorySessionStore::new();
        let id = store.create(&admin(), Duration::from_secs(60)).await.unwrap();

        assert_eq!(store.get(&id).await.unwrap(), Some(admin()));
        store.destroy(&id).await.unwrap();
        assert_eq!(store.get(&id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn expired_sessions_are_gone() {
        let store = MemorySessionStore::new();
        let id = store.create(&admin(), Duration::ZERO).await.unwrap();
        assert_eq!(store.get(&id).await.unwrap(), None);
        assert!(store.sessions.is_empty());
    }

    #[tokio::test]
    async fn creating_a_session_sweeps_expired_ones() {
        let store = MemorySessionStore::new();
        store.create(&admin(), Duration::ZERO).await.unwrap();
        store.create(&admin(), Duration::ZERO).await.unwrap();

        let live = store.create(&admin(), Duration::from_secs(60)).await.unwrap();

        assert_eq!(store.sessions.len(), 1);
        assert!(store.sessions.contains_key(&live));
    }
}
