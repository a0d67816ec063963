use std::sync::Arc;

use tracing::info;

use crate::{
    errors::SessionError,
    repositories::session_store::{MemorySessionStore, RedisSessionStore, SessionStore},
    settings::AppConfig,
};

/// Redis-backed sessions when `redis_url` is set, process-local ones otherwise.
pub async fn create_session_store(config: &AppConfig) -> Result<Arc<dyn SessionStore>, SessionError> {
    match config.redis_url.as_deref().filter(|url| !url.trim().is_empty()) {
        Some(url) => {
            let store = RedisSessionStore::from_url(url)?;
            if let Err(e) = store.ping().await {
                tracing::warn!("Redis not reachable at startup: {}", e);
            } else {
                info!("Redis session store ready");
            }
            Ok(Arc::new(store))
        }
        None => {
            info!("No Redis URL configured, keeping sessions in memory");
            Ok(Arc::new(MemorySessionStore::new()))
        }
    }
}
