use jsonwebtoken::Algorithm;
use serde::Deserialize;
use std::env;
use std::str::FromStr;

use crate::services::{BearerExtractor, JwtDecoder, DEFAULT_BEARER_PATTERN};

/// Configuration surface of the trust core.
///
/// One asymmetric signing scheme per deployment; everything else has a
/// working default.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifierConfig {
    pub algorithm: String,
    pub public_key_path: String,
    pub token_header: String,
    pub bearer_pattern: String,
    pub clock_skew_seconds: i64,
}

impl VerifierConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        Ok(Self {
            algorithm: get_env("OAUTH_SIGNING_ALGORITHM", Some("RS256"))?,
            public_key_path: get_env("OAUTH_PUBLIC_KEY_PATH", None)?,
            token_header: get_env("OAUTH_TOKEN_HEADER", Some("Authorization"))?,
            bearer_pattern: get_env("OAUTH_BEARER_PATTERN", Some(DEFAULT_BEARER_PATTERN))?,
            clock_skew_seconds: get_env("OAUTH_CLOCK_SKEW_SECONDS", Some("0"))?
                .parse()
                .map_err(|e: std::num::ParseIntError| anyhow::anyhow!(e.to_string()))?,
        })
    }

    pub fn algorithm(&self) -> Result<Algorithm, anyhow::Error> {
        Algorithm::from_str(&self.algorithm)
            .map_err(|_| anyhow::anyhow!("unknown signing algorithm: {}", self.algorithm))
    }

    /// Build the token decoder from the configured key and algorithm.
    pub fn decoder(&self) -> Result<JwtDecoder, anyhow::Error> {
        JwtDecoder::from_public_key_file(&self.public_key_path, self.algorithm()?)
    }

    /// Build the bearer extractor from the configured pattern.
    pub fn bearer_extractor(&self) -> Result<BearerExtractor, anyhow::Error> {
        BearerExtractor::new(&self.bearer_pattern)
    }

    pub fn clock_skew(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.clock_skew_seconds)
    }
}

fn get_env(name: &str, default: Option<&str>) -> Result<String, anyhow::Error> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => match default {
            Some(default) => Ok(default.to_string()),
            None => Err(anyhow::anyhow!("missing required env var: {}", name)),
        },
    }
}
