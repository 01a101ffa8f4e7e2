pub mod claims;
pub mod client;
pub mod scope;

pub use claims::AccessTokenClaims;
pub use client::{Client, ClientStatus, GrantType};
pub use scope::{Scope, ScopeId};
