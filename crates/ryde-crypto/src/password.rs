use thiserror::Error;

/// bcrypt cost factor used for every stored password.
pub const SALT_ROUNDS: u32 = 10;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("no stored password hash")]
    MissingHash,

    #[error("bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
}

/// Hash a plaintext password with a fresh random salt.
pub fn hash_password(plain: &str) -> Result<String, CryptoError> {
    Ok(bcrypt::hash(plain, SALT_ROUNDS)?)
}

/// Check a candidate password against a stored hash.
/// A mismatch is `Ok(false)`; an empty or malformed hash is an error.
pub fn compare_password(candidate: &str, stored_hash: &str) -> Result<bool, CryptoError> {
    if stored_hash.is_empty() {
        return Err(CryptoError::MissingHash);
    }
    Ok(bcrypt::verify(candidate, stored_hash)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_password_hashes_differently_but_both_verify() {
        let a = hash_password("secret1").unwrap();
        let b = hash_password("secret1").unwrap();
        assert_ne!(a, b);

        assert!(compare_password("secret1", &a).unwrap());
        assert!(compare_password("secret1", &b).unwrap());
    }

    #[test]
    fn wrong_password_is_false_not_error() {
        let hash = hash_password("secret1").unwrap();
        assert!(!compare_password("secret2", &hash).unwrap());
    }

    #[test]
    fn hash_uses_configured_cost() {
        let hash = hash_password("secret1").unwrap();
        assert!(hash.starts_with("$2b$10$"));
    }

    #[test]
    fn empty_or_malformed_hash_fails() {
        assert!(matches!(compare_password("x", ""), Err(CryptoError::MissingHash)));
        assert!(compare_password("x", "not-a-bcrypt-hash").is_err());
    }
}
