//! Resource-server trust core for an OAuth2 deployment.
//!
//! Decides whether a bearer credential is authentic, unexpired and not
//! revoked, whether a client application is who it claims to be for a
//! grant type, and keeps a client's granted scope set consistent under
//! administration.
//!
//! Persistence, HTTP routing and token minting are external
//! collaborators: storage sits behind the traits in [`repository`]
//! (production implementations in [`store`]), and this crate only ever
//! verifies tokens, it never issues them.

pub mod config;
pub mod models;
pub mod repository;
pub mod services;
pub mod store;
pub mod utils;

pub use config::VerifierConfig;
pub use models::{AccessTokenClaims, Client, ClientStatus, GrantType, Scope, ScopeId};
pub use repository::{ClientLookup, RevocationOracle, ScopeStore, ScopeTx};
pub use services::{
    AuthError, BearerExtractor, ClientAuthenticator, Clock, DecodeError, JwtDecoder,
    ReconcileError, RejectReason, ScopeReconciler, StorageError, SystemClock, TokenVerifier,
};
