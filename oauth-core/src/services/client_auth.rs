use std::sync::Arc;

use crate::models::GrantType;
use crate::repository::ClientLookup;
use crate::utils::secret::{hash_secret, verify_secret, ClientSecret, SecretHash};

/// Decides whether a client application is who it claims to be for a
/// given grant type.
///
/// The outcome is a plain boolean: callers get no signal about whether
/// the identifier exists, the grant was missing or the secret was
/// wrong.
pub struct ClientAuthenticator {
    clients: Arc<dyn ClientLookup>,
    /// Verified against when the client is absent, so "not found" and
    /// "wrong secret" take comparable wall-clock time.
    dummy_hash: SecretHash,
}

impl ClientAuthenticator {
    pub fn new(clients: Arc<dyn ClientLookup>) -> Result<Self, anyhow::Error> {
        let dummy_hash = hash_secret(&ClientSecret::new(
            "decoy-secret-never-issued".to_string(),
        ))?;
        Ok(Self {
            clients,
            dummy_hash,
        })
    }

    /// Authenticate a client for a grant type, short-circuiting on the
    /// first failed check.
    ///
    /// Confidential clients must present a secret that verifies
    /// against the stored hash; public clients pass on status and
    /// grant-type checks alone. Lookup failure is logged and fails
    /// closed.
    pub async fn authenticate(
        &self,
        client_id: &str,
        grant_type: GrantType,
        presented_secret: Option<&str>,
    ) -> bool {
        let client = match self.clients.by_identifier(client_id).await {
            Ok(client) => client,
            Err(e) => {
                tracing::error!(error = %e, "client lookup failed, denying authentication");
                None
            }
        };

        let Some(client) = client else {
            self.burn_verification(presented_secret);
            return false;
        };

        if !client.is_usable() {
            tracing::debug!(client = %client.identifier, status = %client.status, "client not usable");
            return false;
        }

        if !client.permits(grant_type) {
            tracing::debug!(client = %client.identifier, grant_type = %grant_type, "grant type not permitted");
            return false;
        }

        if client.confidential {
            let (Some(secret), Some(hash)) = (presented_secret, client.secret_hash.as_deref())
            else {
                self.burn_verification(presented_secret);
                return false;
            };
            return verify_secret(secret, hash).is_ok();
        }

        // Public client: the secret is not inspected
        true
    }

    fn burn_verification(&self, presented_secret: Option<&str>) {
        let _ = verify_secret(
            presented_secret.unwrap_or(""),
            self.dummy_hash.as_str(),
        );
    }
}
