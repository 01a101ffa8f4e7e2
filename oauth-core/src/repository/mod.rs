//! Repository interfaces implemented by the persistence layer.
//!
//! The trust core only holds these traits; production implementations
//! live in [`crate::store`], test doubles live with the tests.

use async_trait::async_trait;
use std::collections::HashSet;
use uuid::Uuid;

use crate::models::{Client, ScopeId};
use crate::services::error::StorageError;

/// Read access to stored clients.
#[async_trait]
pub trait ClientLookup: Send + Sync {
    /// Find a client by its opaque public identifier, regardless of
    /// status. The authenticator is the single place status is judged.
    async fn by_identifier(&self, identifier: &str) -> Result<Option<Client>, StorageError>;
}

/// Reports whether a token identifier has been revoked.
///
/// This core only queries revocation state, it never writes it.
#[async_trait]
pub trait RevocationOracle: Send + Sync {
    async fn is_revoked(&self, jti: &str) -> Result<bool, StorageError>;
}

/// Transactional access to the client-scope association table.
#[async_trait]
pub trait ScopeStore: Send + Sync {
    /// Universe of scope identifiers that exist.
    async fn known_scopes(&self) -> Result<HashSet<ScopeId>, StorageError>;

    /// Scopes currently granted to a client.
    async fn granted_scopes(&self, client_id: Uuid) -> Result<HashSet<ScopeId>, StorageError>;

    /// Open a transaction scoped to one client. Implementations must
    /// serialize concurrent transactions on the same client; different
    /// clients proceed independently.
    async fn begin(&self, client_id: Uuid) -> Result<Box<dyn ScopeTx>, StorageError>;
}

/// A scoped transaction handle over scope associations.
///
/// Dropping an uncommitted handle rolls the transaction back, so every
/// exit path releases it exactly once.
#[async_trait]
pub trait ScopeTx: Send {
    /// Delete the given associations, returning the number of rows
    /// actually removed.
    async fn delete_associations(
        &mut self,
        client_id: Uuid,
        scope_ids: &[ScopeId],
    ) -> Result<u64, StorageError>;

    async fn insert_association(
        &mut self,
        client_id: Uuid,
        scope_id: ScopeId,
    ) -> Result<(), StorageError>;

    async fn commit(self: Box<Self>) -> Result<(), StorageError>;

    async fn rollback(self: Box<Self>) -> Result<(), StorageError>;
}
