use async_trait::async_trait;
use redis::{aio::ConnectionManager, Client};

use crate::repository::RevocationOracle;
use crate::services::error::StorageError;

/// Redis-backed revocation list.
///
/// Revoked token identifiers are written by the authorization server
/// as `revoked:{jti}` keys expiring with the token; this side only
/// checks key existence.
#[derive(Clone)]
pub struct RedisRevocationList {
    _client: Client,
    manager: ConnectionManager,
}

impl RedisRevocationList {
    pub async fn new(url: &str) -> Result<Self, anyhow::Error> {
        tracing::info!(url = %url, "Connecting to Redis revocation list");
        let client = Client::open(url)?;

        // Use ConnectionManager for automatic reconnection
        let manager = client.get_connection_manager().await.map_err(|e| {
            tracing::error!("Failed to get Redis connection manager: {}", e);
            anyhow::anyhow!("Failed to connect to Redis: {}", e)
        })?;

        Ok(Self {
            _client: client,
            manager,
        })
    }

    pub async fn health_check(&self) -> Result<(), StorageError> {
        let mut conn = self.manager.clone();
        redis::cmd("PING")
            .query_async::<_, ()>(&mut conn)
            .await
            .map_err(|e| StorageError::new(anyhow::anyhow!("Redis health check failed: {}", e)))
    }
}

#[async_trait]
impl RevocationOracle for RedisRevocationList {
    async fn is_revoked(&self, jti: &str) -> Result<bool, StorageError> {
        let mut conn = self.manager.clone();
        let key = format!("revoked:{}", jti);

        let exists: bool = redis::cmd("EXISTS")
            .arg(&key)
            .query_async(&mut conn)
            .await
            .map_err(|e| {
                StorageError::new(anyhow::anyhow!("Failed to check revocation list: {}", e))
            })?;

        Ok(exists)
    }
}
