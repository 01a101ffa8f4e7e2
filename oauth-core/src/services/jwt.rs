use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use std::fs;

use crate::models::AccessTokenClaims;
use crate::services::error::DecodeError;

/// Decodes a compact signed token and verifies its signature against a
/// known RSA public key.
///
/// Pure: no clock reads and no I/O after construction. Time validity
/// and revocation are the verifier's concern, so the underlying
/// `jsonwebtoken` validation is restricted to signature and algorithm
/// checks here.
#[derive(Clone)]
pub struct JwtDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtDecoder {
    /// Create a decoder from RSA public key PEM bytes.
    ///
    /// The algorithm is fixed per deployment and must be in the RSA
    /// family; the header of every presented token must declare it.
    pub fn from_rsa_pem(public_key_pem: &[u8], algorithm: Algorithm) -> Result<Self, anyhow::Error> {
        if !matches!(
            algorithm,
            Algorithm::RS256 | Algorithm::RS384 | Algorithm::RS512
        ) {
            return Err(anyhow::anyhow!(
                "unsupported signing algorithm {:?}, expected an RSA variant",
                algorithm
            ));
        }

        let decoding_key = DecodingKey::from_rsa_pem(public_key_pem)
            .map_err(|e| anyhow::anyhow!("Failed to parse public key: {}", e))?;

        let mut validation = Validation::new(algorithm);
        // The verifier enforces the time window against an injectable
        // clock; signature and algorithm are all that is checked here.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();
        validation.leeway = 0;

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    /// Create a decoder by loading the RSA public key from a PEM file.
    pub fn from_public_key_file(path: &str, algorithm: Algorithm) -> Result<Self, anyhow::Error> {
        let public_key_pem = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read public key from {}: {}", path, e))?;

        let decoder = Self::from_rsa_pem(public_key_pem.as_bytes(), algorithm)?;
        tracing::info!(path = %path, "token decoder initialized with RSA public key");
        Ok(decoder)
    }

    /// Decode a compact token and verify its signature.
    ///
    /// Rejects anything that is not a three-segment compact structure
    /// before handing it to the crypto layer.
    pub fn decode(&self, compact_token: &str) -> Result<AccessTokenClaims, DecodeError> {
        if !has_compact_structure(compact_token) {
            return Err(DecodeError::MalformedToken(
                "expected three dot-separated segments".to_string(),
            ));
        }

        let token_data = decode::<AccessTokenClaims>(
            compact_token,
            &self.decoding_key,
            &self.validation,
        )
        .map_err(map_decode_error)?;

        Ok(token_data.claims)
    }
}

/// Header, payload and signature segments, all non-empty. The header
/// and payload must decode; the signature segment may be garbage until
/// verification proves otherwise.
fn has_compact_structure(token: &str) -> bool {
    let segments: Vec<&str> = token.split('.').collect();
    segments.len() == 3 && segments.iter().all(|s| !s.is_empty())
}

fn map_decode_error(err: jsonwebtoken::errors::Error) -> DecodeError {
    match err.kind() {
        ErrorKind::InvalidSignature => DecodeError::SignatureInvalid,
        ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
            DecodeError::UnsupportedAlgorithm
        }
        other => DecodeError::MalformedToken(format!("{:?}", other)),
    }
}
