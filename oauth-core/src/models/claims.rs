use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Claims carried by a verified access token.
///
/// Constructed fresh per verification, never cached across requests.
/// Registered claims are parsed into fields; anything else the issuer
/// put in the payload is preserved opaquely in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// JWT ID, the revocation lookup key
    pub jti: String,
    /// Subject (user or client the token was issued to)
    pub sub: String,
    /// Expiration time (Unix timestamp, exclusive)
    pub exp: i64,
    /// Not-before time (Unix timestamp, inclusive)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
    /// Issued at (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Scopes granted to the token
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scopes: Vec<String>,
    /// Unrecognized claims, kept as-is but never interpreted
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl AccessTokenClaims {
    /// Whether the token carries the given scope.
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.iter().any(|s| s == scope)
    }
}
