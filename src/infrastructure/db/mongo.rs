use std::{sync::Arc, time::Duration};

use mongodb::{options::ClientOptions, Client};
use tracing::info;

use crate::{
    errors::StoreError,
    repositories::{document_store::{DocumentStore, SharedStore}, memory_store::MemoryStore, mongo_store::MongoStore},
    settings::AppConfig,
};

const MEMORY_SCHEME: &str = "memory://";

pub async fn connect(database_url: &str, database_name: &str) -> Result<MongoStore, StoreError> {
    let max_retries = 5;
    let mut retry_count = 0;
    let mut wait_seconds = 2;

    let mut options = ClientOptions::parse(database_url)
        .await
        .map_err(|e| StoreError::Connection(e.to_string()))?;
    options.app_name.get_or_insert_with(|| env!("CARGO_PKG_NAME").to_string());
    let client = Client::with_options(options).map_err(|e| StoreError::Connection(e.to_string()))?;
    let store = MongoStore::new(client, database_name);

    loop {
        match store.ping().await {
            Ok(()) => {
                info!(database = database_name, "Database connection established.");
                return Ok(store);
            }
            Err(e) if retry_count < max_retries => {
                retry_count += 1;
                info!(
                    "Failed to reach database (attempt {}/{}): {}. Retrying in {}s...",
                    retry_count, max_retries, e, wait_seconds
                );

                tokio::time::sleep(Duration::from_secs(wait_seconds)).await;

                wait_seconds *= 2;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Builds the store named by `database_url`: `memory://` or a MongoDB URI.
pub async fn create_store(config: &AppConfig) -> Result<SharedStore, StoreError> {
    if config.database_url.starts_with(MEMORY_SCHEME) {
        info!("Using in-memory document store");
        return Ok(Arc::new(MemoryStore::new()));
    }
    let store = connect(&config.database_url, &config.database_name).await?;
    Ok(Arc::new(store))
}
