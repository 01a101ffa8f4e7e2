//! Test helper module for oauth-core integration tests.
//!
//! Provides a cached RSA test key pair, token minting helpers and
//! in-memory implementations of the repository interfaces.

#![allow(dead_code)]

use async_trait::async_trait;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use once_cell::sync::Lazy;
use rsa::pkcs1::{EncodeRsaPrivateKey, EncodeRsaPublicKey, LineEnding};
use rsa::RsaPrivateKey;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use oauth_core::repository::{ClientLookup, RevocationOracle, ScopeStore, ScopeTx};
use oauth_core::services::StorageError;
use oauth_core::{AccessTokenClaims, Client, ClientStatus, GrantType, JwtDecoder, ScopeId};

pub struct TestKeys {
    pub private_pem: String,
    pub public_pem: String,
}

/// RSA key pair generated once per test binary; 2048-bit generation is
/// slow enough to be worth caching.
pub static KEYS: Lazy<TestKeys> = Lazy::new(|| {
    let mut rng = rand::thread_rng();
    let private_key = RsaPrivateKey::new(&mut rng, 2048).expect("failed to generate RSA key");

    let private_pem = private_key
        .to_pkcs1_pem(LineEnding::LF)
        .expect("failed to encode private key")
        .to_string();
    let public_pem = private_key
        .to_public_key()
        .to_pkcs1_pem(LineEnding::LF)
        .expect("failed to encode public key");

    TestKeys {
        private_pem,
        public_pem,
    }
});

pub fn decoder() -> JwtDecoder {
    JwtDecoder::from_rsa_pem(KEYS.public_pem.as_bytes(), Algorithm::RS256)
        .expect("failed to build decoder")
}

pub fn claims(jti: &str, exp: i64) -> AccessTokenClaims {
    AccessTokenClaims {
        jti: jti.to_string(),
        sub: "user-1".to_string(),
        exp,
        nbf: None,
        iat: None,
        scopes: vec!["profile".to_string()],
        extra: HashMap::new(),
    }
}

/// Mint a compact token signed with the test private key.
pub fn mint(claims: &AccessTokenClaims) -> String {
    mint_with_algorithm(claims, Algorithm::RS256)
}

pub fn mint_with_algorithm(claims: &AccessTokenClaims, algorithm: Algorithm) -> String {
    let key = EncodingKey::from_rsa_pem(KEYS.private_pem.as_bytes())
        .expect("failed to load signing key");
    encode(&Header::new(algorithm), claims, &key).expect("failed to mint token")
}

/// Flip one character inside the signature segment, keeping the token
/// structurally valid.
pub fn tamper_signature(token: &str) -> String {
    let dot = token.rfind('.').expect("token has no signature segment");
    let (head, signature) = token.split_at(dot + 1);
    let mut chars: Vec<char> = signature.chars().collect();
    chars[10] = if chars[10] == 'A' { 'B' } else { 'A' };
    format!("{}{}", head, chars.into_iter().collect::<String>())
}

// ---------------------------------------------------------------------
// Repository fakes
// ---------------------------------------------------------------------

/// Revocation oracle answering from a fixed set of jtis.
#[derive(Default)]
pub struct StaticRevocationList {
    revoked: HashSet<String>,
}

impl StaticRevocationList {
    pub fn revoking(jtis: &[&str]) -> Self {
        Self {
            revoked: jtis.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[async_trait]
impl RevocationOracle for StaticRevocationList {
    async fn is_revoked(&self, jti: &str) -> Result<bool, StorageError> {
        Ok(self.revoked.contains(jti))
    }
}

/// Oracle whose backing store is down.
pub struct FailingRevocationList;

#[async_trait]
impl RevocationOracle for FailingRevocationList {
    async fn is_revoked(&self, _jti: &str) -> Result<bool, StorageError> {
        Err(StorageError::msg("revocation list unavailable"))
    }
}

/// Client lookup answering from a fixed map.
#[derive(Default)]
pub struct InMemoryClients {
    clients: HashMap<String, Client>,
}

impl InMemoryClients {
    pub fn with(clients: Vec<Client>) -> Self {
        Self {
            clients: clients
                .into_iter()
                .map(|c| (c.identifier.clone(), c))
                .collect(),
        }
    }
}

#[async_trait]
impl ClientLookup for InMemoryClients {
    async fn by_identifier(&self, identifier: &str) -> Result<Option<Client>, StorageError> {
        Ok(self.clients.get(identifier).cloned())
    }
}

/// Lookup whose backing store is down.
pub struct FailingClients;

#[async_trait]
impl ClientLookup for FailingClients {
    async fn by_identifier(&self, _identifier: &str) -> Result<Option<Client>, StorageError> {
        Err(StorageError::msg("client store unavailable"))
    }
}

pub fn test_client(identifier: &str) -> Client {
    Client {
        id: Uuid::new_v4(),
        identifier: identifier.to_string(),
        secret_hash: None,
        confidential: false,
        status: ClientStatus::Active,
        grant_types: vec![GrantType::AuthorizationCode],
    }
}

// ---------------------------------------------------------------------
// In-memory scope store
// ---------------------------------------------------------------------

/// Failure modes a test can inject into scope transactions.
#[derive(Default, Clone, Copy)]
pub struct ScopeStoreFaults {
    /// Report one fewer deleted row than requested, as a concurrent
    /// reconciliation would
    pub short_delete: bool,
    /// Fail the insertion of this scope id
    pub fail_insert_on: Option<ScopeId>,
}

/// Scope store over a shared in-memory map. Transactions stage their
/// changes on a working copy and only publish on commit.
pub struct InMemoryScopeStore {
    known: HashSet<ScopeId>,
    granted: Arc<Mutex<HashMap<Uuid, HashSet<ScopeId>>>>,
    faults: ScopeStoreFaults,
}

impl InMemoryScopeStore {
    pub fn new(known: &[i64]) -> Self {
        Self {
            known: known.iter().copied().map(ScopeId).collect(),
            granted: Arc::new(Mutex::new(HashMap::new())),
            faults: ScopeStoreFaults::default(),
        }
    }

    pub fn with_faults(mut self, faults: ScopeStoreFaults) -> Self {
        self.faults = faults;
        self
    }

    pub fn grant(&self, client_id: Uuid, scopes: &[i64]) {
        self.granted
            .lock()
            .unwrap()
            .insert(client_id, scopes.iter().copied().map(ScopeId).collect());
    }

    pub fn granted_for(&self, client_id: Uuid) -> HashSet<ScopeId> {
        self.granted
            .lock()
            .unwrap()
            .get(&client_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl ScopeStore for InMemoryScopeStore {
    async fn known_scopes(&self) -> Result<HashSet<ScopeId>, StorageError> {
        Ok(self.known.clone())
    }

    async fn granted_scopes(&self, client_id: Uuid) -> Result<HashSet<ScopeId>, StorageError> {
        Ok(self.granted_for(client_id))
    }

    async fn begin(&self, client_id: Uuid) -> Result<Box<dyn ScopeTx>, StorageError> {
        let staged = self.granted_for(client_id);
        Ok(Box::new(InMemoryScopeTx {
            shared: Arc::clone(&self.granted),
            client_id,
            staged,
            faults: self.faults,
        }))
    }
}

struct InMemoryScopeTx {
    shared: Arc<Mutex<HashMap<Uuid, HashSet<ScopeId>>>>,
    client_id: Uuid,
    staged: HashSet<ScopeId>,
    faults: ScopeStoreFaults,
}

#[async_trait]
impl ScopeTx for InMemoryScopeTx {
    async fn delete_associations(
        &mut self,
        _client_id: Uuid,
        scope_ids: &[ScopeId],
    ) -> Result<u64, StorageError> {
        let mut deleted = 0u64;
        for id in scope_ids {
            if self.staged.remove(id) {
                deleted += 1;
            }
        }
        if self.faults.short_delete {
            deleted = deleted.saturating_sub(1);
        }
        Ok(deleted)
    }

    async fn insert_association(
        &mut self,
        _client_id: Uuid,
        scope_id: ScopeId,
    ) -> Result<(), StorageError> {
        if self.faults.fail_insert_on == Some(scope_id) {
            return Err(StorageError::msg(format!(
                "insert failed for scope {}",
                scope_id
            )));
        }
        self.staged.insert(scope_id);
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), StorageError> {
        self.shared
            .lock()
            .unwrap()
            .insert(self.client_id, self.staged);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StorageError> {
        // Staged changes are simply discarded
        Ok(())
    }
}
