use crate::models::ScopeId;
use std::fmt;
use thiserror::Error;

/// Failure of a backing store (database, revocation list). Implies
/// "unknown", never "rejected": callers must not cache it as a
/// negative authentication result.
#[derive(Debug, Error)]
#[error("backing store failure: {0}")]
pub struct StorageError(#[from] anyhow::Error);

impl StorageError {
    pub fn new<E>(err: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        StorageError(err.into())
    }

    pub fn msg<M>(msg: M) -> Self
    where
        M: fmt::Display + fmt::Debug + Send + Sync + 'static,
    {
        StorageError(anyhow::Error::msg(msg))
    }
}

/// Structural or cryptographic rejection of a compact token.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// Not three independently decodable segments, or the payload is
    /// not a valid claim set
    #[error("malformed token: {0}")]
    MalformedToken(String),

    #[error("token signature verification failed")]
    SignatureInvalid,

    /// Header declares an algorithm other than the configured one
    #[error("token signed with an unsupported algorithm")]
    UnsupportedAlgorithm,
}

/// Why a token was rejected. Carried as structured metadata inside the
/// unified `AuthError::Unauthenticated` outcome; callers reject the
/// request identically for every reason and may log it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    Malformed,
    BadSignature,
    UnsupportedAlgorithm,
    Expired,
    NotYetValid,
    Revoked,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let reason = match self {
            RejectReason::Malformed => "malformed token",
            RejectReason::BadSignature => "invalid signature",
            RejectReason::UnsupportedAlgorithm => "unsupported algorithm",
            RejectReason::Expired => "expired or not yet valid",
            RejectReason::NotYetValid => "expired or not yet valid",
            RejectReason::Revoked => "revoked",
        };
        f.write_str(reason)
    }
}

/// Outcome of a failed token verification.
///
/// `Unauthenticated` means the token was examined and rejected.
/// `Infrastructure` means the answer is unknown because a collaborator
/// failed; it is never downgraded to a rejection.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("unauthenticated: {0}")]
    Unauthenticated(RejectReason),

    #[error("infrastructure failure during verification: {0}")]
    Infrastructure(#[from] StorageError),
}

impl AuthError {
    pub fn reason(&self) -> Option<RejectReason> {
        match self {
            AuthError::Unauthenticated(reason) => Some(*reason),
            AuthError::Infrastructure(_) => None,
        }
    }
}

impl From<DecodeError> for AuthError {
    fn from(err: DecodeError) -> Self {
        let reason = match err {
            DecodeError::MalformedToken(_) => RejectReason::Malformed,
            DecodeError::SignatureInvalid => RejectReason::BadSignature,
            DecodeError::UnsupportedAlgorithm => RejectReason::UnsupportedAlgorithm,
        };
        AuthError::Unauthenticated(reason)
    }
}

/// Outcome of a failed scope reconciliation. The stored scope set is
/// unchanged whenever one of these is returned.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Target set names scopes that do not exist
    #[error("unknown scope identifiers: {0:?}")]
    InvalidScope(Vec<ScopeId>),

    /// A concurrent reconciliation raced on the same client
    #[error("scope set was modified concurrently")]
    ConcurrentModification,

    #[error("storage failure during reconciliation: {0}")]
    Storage(#[from] StorageError),
}
