use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Newtype for a client secret to prevent accidental logging
#[derive(Clone)]
pub struct ClientSecret(String);

impl ClientSecret {
    pub fn new(secret: String) -> Self {
        Self(secret)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ClientSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str("ClientSecret(...)")
    }
}

/// Newtype for a stored secret hash
#[derive(Debug, Clone)]
pub struct SecretHash(String);

impl SecretHash {
    pub fn new(hash: String) -> Self {
        Self(hash)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Hash a client secret using Argon2
///
/// Uses the Argon2id variant with secure default parameters.
/// Salt is automatically generated and included in the hash.
pub fn hash_secret(secret: &ClientSecret) -> Result<SecretHash, anyhow::Error> {
    let argon2 = Argon2::default();
    let salt = SaltString::generate(&mut OsRng);

    let secret_hash = argon2
        .hash_password(secret.as_str().as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash secret: {}", e))?
        .to_string();

    Ok(SecretHash::new(secret_hash))
}

/// Verify a presented secret against a stored hash
///
/// Returns Ok(()) if the secret matches, Err otherwise. The comparison
/// inside argon2 is constant-time.
pub fn verify_secret(secret: &str, secret_hash: &str) -> Result<(), anyhow::Error> {
    let parsed_hash = PasswordHash::new(secret_hash)
        .map_err(|e| anyhow::anyhow!("Invalid secret hash format: {}", e))?;

    Argon2::default()
        .verify_password(secret.as_bytes(), &parsed_hash)
        .map_err(|_| anyhow::anyhow!("Secret verification failed"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_secret() {
        let secret = ClientSecret::new("app-secret-123".to_string());
        let hash = hash_secret(&secret).expect("Failed to hash secret");

        assert!(!hash.as_str().is_empty());
        assert!(hash.as_str().starts_with("$argon2"));
    }

    #[test]
    fn test_verify_secret_correct() {
        let secret = ClientSecret::new("app-secret-123".to_string());
        let hash = hash_secret(&secret).expect("Failed to hash secret");

        assert!(verify_secret(secret.as_str(), hash.as_str()).is_ok());
    }

    #[test]
    fn test_verify_secret_incorrect() {
        let secret = ClientSecret::new("app-secret-123".to_string());
        let hash = hash_secret(&secret).expect("Failed to hash secret");

        assert!(verify_secret("wrong-secret", hash.as_str()).is_err());
    }

    #[test]
    fn test_different_hashes_for_same_secret() {
        let secret = ClientSecret::new("app-secret-123".to_string());
        let hash1 = hash_secret(&secret).expect("Failed to hash secret");
        let hash2 = hash_secret(&secret).expect("Failed to hash secret");

        // Random salt means distinct hashes that both verify
        assert_ne!(hash1.as_str(), hash2.as_str());
        assert!(verify_secret(secret.as_str(), hash1.as_str()).is_ok());
        assert!(verify_secret(secret.as_str(), hash2.as_str()).is_ok());
    }

    #[test]
    fn test_debug_does_not_expose_secret() {
        let secret = ClientSecret::new("app-secret-123".to_string());
        assert!(!format!("{:?}", secret).contains("app-secret-123"));
    }
}
