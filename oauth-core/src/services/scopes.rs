use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use crate::models::ScopeId;
use crate::repository::{ScopeStore, ScopeTx};
use crate::services::error::ReconcileError;

/// Reconciles a client's granted scope set with a requested target set
/// as one atomic unit.
///
/// After a successful `reconcile` the stored set equals the target; on
/// any failure the stored set is unchanged.
pub struct ScopeReconciler {
    store: Arc<dyn ScopeStore>,
}

impl ScopeReconciler {
    pub fn new(store: Arc<dyn ScopeStore>) -> Self {
        Self { store }
    }

    /// Bring the client's granted scopes to exactly `target`.
    ///
    /// Unknown target identifiers fail validation before any mutation.
    /// Inside the transaction, a deletion count that differs from the
    /// expected removal set aborts with `ConcurrentModification`.
    pub async fn reconcile(
        &self,
        client_id: Uuid,
        target: &HashSet<ScopeId>,
    ) -> Result<(), ReconcileError> {
        let known = self.store.known_scopes().await?;
        let mut unknown: Vec<ScopeId> = target.difference(&known).copied().collect();
        if !unknown.is_empty() {
            unknown.sort();
            return Err(ReconcileError::InvalidScope(unknown));
        }

        let current = self.store.granted_scopes(client_id).await?;
        let to_remove: Vec<ScopeId> = current.difference(target).copied().collect();
        let to_add: Vec<ScopeId> = target.difference(&current).copied().collect();

        if to_remove.is_empty() && to_add.is_empty() {
            return Ok(());
        }

        let mut tx = self.store.begin(client_id).await?;
        match apply(tx.as_mut(), client_id, &to_remove, &to_add).await {
            Ok(()) => {
                tx.commit().await?;
                tracing::info!(
                    client_id = %client_id,
                    removed = to_remove.len(),
                    added = to_add.len(),
                    "scope set reconciled"
                );
                Ok(())
            }
            Err(err) => {
                tracing::warn!(client_id = %client_id, error = %err, "scope reconciliation aborted");
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!(client_id = %client_id, error = %rollback_err, "rollback failed");
                }
                Err(err)
            }
        }
    }
}

async fn apply(
    tx: &mut dyn ScopeTx,
    client_id: Uuid,
    to_remove: &[ScopeId],
    to_add: &[ScopeId],
) -> Result<(), ReconcileError> {
    if !to_remove.is_empty() {
        let deleted = tx.delete_associations(client_id, to_remove).await?;
        if deleted != to_remove.len() as u64 {
            return Err(ReconcileError::ConcurrentModification);
        }
    }

    for &scope_id in to_add {
        tx.insert_association(client_id, scope_id).await?;
    }

    Ok(())
}
