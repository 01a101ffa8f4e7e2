use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use std::sync::Arc;

use crate::models::AccessTokenClaims;
use crate::repository::RevocationOracle;
use crate::services::error::{AuthError, RejectReason};
use crate::services::jwt::JwtDecoder;

/// Default pattern for the Authorization header value: a case-sensitive
/// "Bearer " prefix with the credential captured after it.
pub const DEFAULT_BEARER_PATTERN: &str = r"^Bearer\s+(.*)$";

/// Injectable time source so verification is deterministic under test.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time source used outside tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Pulls the bearer credential out of a header value.
///
/// A pure string operation, not itself a security boundary: whatever is
/// captured still has to pass verification.
#[derive(Debug, Clone)]
pub struct BearerExtractor {
    pattern: Regex,
}

impl BearerExtractor {
    /// Compile an extraction pattern. The pattern must contain exactly
    /// one capturing group, which captures the credential.
    pub fn new(pattern: &str) -> Result<Self, anyhow::Error> {
        let pattern = Regex::new(pattern)
            .map_err(|e| anyhow::anyhow!("invalid bearer pattern: {}", e))?;

        // captures_len counts the implicit whole-match group
        if pattern.captures_len() != 2 {
            return Err(anyhow::anyhow!(
                "bearer pattern must have exactly one capturing group, found {}",
                pattern.captures_len() - 1
            ));
        }

        Ok(Self { pattern })
    }

    /// Returns the captured credential, or `None` when the header is
    /// absent or does not match the pattern.
    pub fn extract(&self, header_value: Option<&str>) -> Option<String> {
        let header_value = header_value?;
        let captures = self.pattern.captures(header_value)?;
        captures.get(1).map(|m| m.as_str().to_string())
    }
}

/// Orchestrates decode, time validity and revocation into a single
/// authenticated-claims-or-rejection decision.
pub struct TokenVerifier {
    decoder: JwtDecoder,
    revocations: Arc<dyn RevocationOracle>,
    clock: Arc<dyn Clock>,
    clock_skew: Duration,
}

impl TokenVerifier {
    pub fn new(decoder: JwtDecoder, revocations: Arc<dyn RevocationOracle>) -> Self {
        Self {
            decoder,
            revocations,
            clock: Arc::new(SystemClock),
            clock_skew: Duration::zero(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Allow the given skew on both ends of the validity window.
    /// Defaults to zero.
    pub fn with_clock_skew(mut self, skew: Duration) -> Self {
        self.clock_skew = skew;
        self
    }

    /// Verify a compact token against the injected clock.
    pub async fn verify(&self, compact_token: &str) -> Result<AccessTokenClaims, AuthError> {
        self.verify_at(compact_token, self.clock.now()).await
    }

    /// Verify a compact token as of an explicit instant.
    ///
    /// Accepts only when `nbf - skew <= now < exp + skew` (so
    /// `now == exp` is already rejected at zero skew), the signature
    /// verifies and the jti has not been revoked. Oracle failure is
    /// surfaced as [`AuthError::Infrastructure`]; it is never treated
    /// as either revoked or valid.
    pub async fn verify_at(
        &self,
        compact_token: &str,
        now: DateTime<Utc>,
    ) -> Result<AccessTokenClaims, AuthError> {
        let claims = self.decoder.decode(compact_token)?;

        let now = now.timestamp();
        let skew = self.clock_skew.num_seconds();

        if let Some(nbf) = claims.nbf {
            if now < nbf - skew {
                tracing::debug!(jti = %claims.jti, nbf, "token not yet valid");
                return Err(AuthError::Unauthenticated(RejectReason::NotYetValid));
            }
        }
        if now >= claims.exp + skew {
            tracing::debug!(jti = %claims.jti, exp = claims.exp, "token expired");
            return Err(AuthError::Unauthenticated(RejectReason::Expired));
        }

        if self.revocations.is_revoked(&claims.jti).await? {
            tracing::warn!(jti = %claims.jti, "rejected revoked token");
            return Err(AuthError::Unauthenticated(RejectReason::Revoked));
        }

        Ok(claims)
    }
}
