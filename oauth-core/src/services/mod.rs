//! Trust-core services.
//!
//! Token verification, client authentication and scope reconciliation,
//! built over the repository interfaces in [`crate::repository`].

mod client_auth;
pub mod error;
mod jwt;
mod scopes;
mod verifier;

pub use client_auth::ClientAuthenticator;
pub use error::{AuthError, DecodeError, ReconcileError, RejectReason, StorageError};
pub use jwt::JwtDecoder;
pub use scopes::ScopeReconciler;
pub use verifier::{
    BearerExtractor, Clock, SystemClock, TokenVerifier, DEFAULT_BEARER_PATTERN,
};
