//! PostgreSQL implementations of the repository interfaces.
//!
//! Uses sqlx with runtime-checked queries.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, Postgres};
use sqlx::Transaction;
use std::collections::HashSet;
use std::str::FromStr;
use uuid::Uuid;

use crate::models::{Client, ClientStatus, GrantType, Scope, ScopeId};
use crate::repository::{ClientLookup, ScopeStore, ScopeTx};
use crate::services::error::StorageError;

/// PostgreSQL-backed client and scope store.
#[derive(Clone)]
pub struct PgAuthStore {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct ClientRow {
    client_id: Uuid,
    identifier: String,
    secret_hash: Option<String>,
    confidential: bool,
    status_code: String,
}

impl PgAuthStore {
    /// Create a new store from a connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Health check - ping the database.
    pub async fn health_check(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Database health check failed: {}", e);
                StorageError::new(anyhow::anyhow!(e))
            })?;
        Ok(())
    }

    /// All scopes with their display names, for administrative
    /// listings.
    pub async fn list_scopes(&self) -> Result<Vec<Scope>, StorageError> {
        let rows: Vec<(i64, String)> =
            sqlx::query_as("SELECT scope_id, scope_name FROM scopes ORDER BY scope_id")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| StorageError::new(anyhow::anyhow!(e)))?;

        Ok(rows
            .into_iter()
            .map(|(id, name)| Scope {
                id: ScopeId(id),
                name,
            })
            .collect())
    }

    async fn grant_types_for(&self, client_id: Uuid) -> Result<Vec<GrantType>, StorageError> {
        let tags: Vec<String> =
            sqlx::query_scalar("SELECT grant_type FROM client_grant_types WHERE client_id = $1")
                .bind(client_id)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| StorageError::new(anyhow::anyhow!(e)))?;

        tags.iter()
            .map(|tag| GrantType::from_str(tag).map_err(StorageError::msg))
            .collect()
    }
}

#[async_trait]
impl ClientLookup for PgAuthStore {
    async fn by_identifier(&self, identifier: &str) -> Result<Option<Client>, StorageError> {
        let row = sqlx::query_as::<_, ClientRow>(
            r#"
            SELECT client_id, identifier, secret_hash, confidential, status_code
            FROM clients
            WHERE identifier = $1
            "#,
        )
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::new(anyhow::anyhow!(e)))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let status = ClientStatus::from_str(&row.status_code).map_err(StorageError::msg)?;
        let grant_types = self.grant_types_for(row.client_id).await?;

        Ok(Some(Client {
            id: row.client_id,
            identifier: row.identifier,
            secret_hash: row.secret_hash,
            confidential: row.confidential,
            status,
            grant_types,
        }))
    }
}

#[async_trait]
impl ScopeStore for PgAuthStore {
    async fn known_scopes(&self) -> Result<HashSet<ScopeId>, StorageError> {
        let ids: Vec<i64> = sqlx::query_scalar("SELECT scope_id FROM scopes")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StorageError::new(anyhow::anyhow!(e)))?;

        Ok(ids.into_iter().map(ScopeId).collect())
    }

    async fn granted_scopes(&self, client_id: Uuid) -> Result<HashSet<ScopeId>, StorageError> {
        let ids: Vec<i64> =
            sqlx::query_scalar("SELECT scope_id FROM client_scopes WHERE client_id = $1")
                .bind(client_id)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| StorageError::new(anyhow::anyhow!(e)))?;

        Ok(ids.into_iter().map(ScopeId).collect())
    }

    async fn begin(&self, client_id: Uuid) -> Result<Box<dyn ScopeTx>, StorageError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StorageError::new(anyhow::anyhow!(e)))?;

        // Row lock serializes reconciliations on the same client;
        // different clients do not contend.
        let locked: Option<Uuid> =
            sqlx::query_scalar("SELECT client_id FROM clients WHERE client_id = $1 FOR UPDATE")
                .bind(client_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| StorageError::new(anyhow::anyhow!(e)))?;

        if locked.is_none() {
            return Err(StorageError::msg(format!(
                "client {} not found, cannot open scope transaction",
                client_id
            )));
        }

        Ok(Box::new(PgScopeTx { tx }))
    }
}

/// One open reconciliation transaction. Dropped uncommitted, the
/// underlying sqlx transaction rolls back.
struct PgScopeTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl ScopeTx for PgScopeTx {
    async fn delete_associations(
        &mut self,
        client_id: Uuid,
        scope_ids: &[ScopeId],
    ) -> Result<u64, StorageError> {
        let ids: Vec<i64> = scope_ids.iter().map(|s| s.0).collect();

        let result =
            sqlx::query("DELETE FROM client_scopes WHERE client_id = $1 AND scope_id = ANY($2)")
                .bind(client_id)
                .bind(&ids)
                .execute(&mut *self.tx)
                .await
                .map_err(|e| StorageError::new(anyhow::anyhow!(e)))?;

        Ok(result.rows_affected())
    }

    async fn insert_association(
        &mut self,
        client_id: Uuid,
        scope_id: ScopeId,
    ) -> Result<(), StorageError> {
        sqlx::query("INSERT INTO client_scopes (client_id, scope_id) VALUES ($1, $2)")
            .bind(client_id)
            .bind(scope_id)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| StorageError::new(anyhow::anyhow!(e)))?;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), StorageError> {
        self.tx
            .commit()
            .await
            .map_err(|e| StorageError::new(anyhow::anyhow!(e)))
    }

    async fn rollback(self: Box<Self>) -> Result<(), StorageError> {
        self.tx
            .rollback()
            .await
            .map_err(|e| StorageError::new(anyhow::anyhow!(e)))
    }
}
