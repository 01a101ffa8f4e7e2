use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a scope as stored in the scope table.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, sqlx::Type,
)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct ScopeId(pub i64);

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i64> for ScopeId {
    fn from(id: i64) -> Self {
        ScopeId(id)
    }
}

/// A named permission unit a client may be granted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Scope {
    pub id: ScopeId,
    pub name: String,
}
