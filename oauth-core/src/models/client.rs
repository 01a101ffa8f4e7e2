use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Lifecycle state of a client. The authentication decision consults
/// this once; only `Active` clients may authenticate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ClientStatus {
    Active,
    Inactive,
    Deleted,
}

impl fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ClientStatus::Active => write!(f, "active"),
            ClientStatus::Inactive => write!(f, "inactive"),
            ClientStatus::Deleted => write!(f, "deleted"),
        }
    }
}

impl FromStr for ClientStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ClientStatus::Active),
            "inactive" => Ok(ClientStatus::Inactive),
            "deleted" => Ok(ClientStatus::Deleted),
            other => Err(format!("unknown client status: {}", other)),
        }
    }
}

/// OAuth2 grant type a client may be permitted to use.
///
/// A (client, grant type) pair is unique in the permitted-grants
/// relation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GrantType {
    AuthorizationCode,
    ClientCredentials,
    Implicit,
    Password,
    RefreshToken,
}

impl GrantType {
    pub const ALL: [GrantType; 5] = [
        GrantType::AuthorizationCode,
        GrantType::ClientCredentials,
        GrantType::Implicit,
        GrantType::Password,
        GrantType::RefreshToken,
    ];

    /// Wire tag, as it appears in token requests and storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            GrantType::AuthorizationCode => "authorization_code",
            GrantType::ClientCredentials => "client_credentials",
            GrantType::Implicit => "implicit",
            GrantType::Password => "password",
            GrantType::RefreshToken => "refresh_token",
        }
    }

    /// Human label for administrative displays.
    pub fn label(&self) -> &'static str {
        match self {
            GrantType::AuthorizationCode => "Authorization code",
            GrantType::ClientCredentials => "Client credentials",
            GrantType::Implicit => "Implicit",
            GrantType::Password => "Password",
            GrantType::RefreshToken => "Refresh token",
        }
    }
}

impl fmt::Display for GrantType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GrantType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "authorization_code" => Ok(GrantType::AuthorizationCode),
            "client_credentials" => Ok(GrantType::ClientCredentials),
            "implicit" => Ok(GrantType::Implicit),
            "password" => Ok(GrantType::Password),
            "refresh_token" => Ok(GrantType::RefreshToken),
            other => Err(format!("unknown grant type: {}", other)),
        }
    }
}

/// An OAuth2 client application as seen by the trust core.
///
/// Owned by the persistence layer; this is a transient, request-scoped
/// read model. Confidential clients carry an argon2 hash of their
/// secret, public clients carry none.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: Uuid,
    /// Opaque public identifier presented in token requests
    pub identifier: String,
    pub secret_hash: Option<String>,
    pub confidential: bool,
    pub status: ClientStatus,
    /// Grant types this client is permitted to use
    pub grant_types: Vec<GrantType>,
}

impl Client {
    pub fn is_usable(&self) -> bool {
        self.status == ClientStatus::Active
    }

    pub fn permits(&self, grant_type: GrantType) -> bool {
        self.grant_types.contains(&grant_type)
    }
}
