//! Password service - salted Argon2id hashing
//!
//! Hashes are stored as PHC strings (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`),
//! so each hash carries the parameters it was made with and can be verified
//! after the configured parameters change.

use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::Rng;

use crate::domain::result::{Error, Result};
use crate::domain::Argon2Params;

/// Salt length in bytes
const SALT_LEN: usize = 16;

/// Password hashing and verification
#[derive(Debug, Clone)]
pub struct PasswordService {
    params: Argon2Params,
}

impl Default for PasswordService {
    fn default() -> Self {
        Self::new(Argon2Params::default())
    }
}

impl PasswordService {
    pub fn new(params: Argon2Params) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &Argon2Params {
        &self.params
    }

    fn argon2(&self) -> Result<Argon2<'static>> {
        let params = Params::new(
            self.params.memory_cost,
            self.params.time_cost,
            self.params.parallelism,
            Some(self.params.hash_len as usize),
        )
        .map_err(|e| Error::hashing(format!("Invalid argon2 params: {}", e)))?;

        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    /// Hash a password with a fresh random salt
    pub fn hash(&self, password: &str) -> Result<String> {
        let salt_bytes: [u8; SALT_LEN] = rand::thread_rng().gen();
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|e| Error::hashing(format!("Failed to encode salt: {}", e)))?;

        let hash = self
            .argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| Error::hashing(format!("Failed to hash password: {}", e)))?;

        Ok(hash.to_string())
    }

    /// Check a password against a stored PHC string
    ///
    /// The comparison is constant-time. Returns `Ok(false)` for a wrong
    /// password and an error only when the stored hash is unreadable.
    pub fn verify(&self, password: &str, encoded: &str) -> Result<bool> {
        let parsed = PasswordHash::new(encoded)
            .map_err(|e| Error::hashing(format!("Malformed password hash: {}", e)))?;

        // Parameters come from the PHC string, not from self.params
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(Error::hashing(format!("Failed to verify password: {}", e))),
        }
    }

    /// Whether a stored hash was made with different parameters than the
    /// configured ones and should be replaced on the next successful login
    pub fn needs_rehash(&self, encoded: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(encoded) else {
            return true;
        };
        if parsed.algorithm.as_str() != Algorithm::Argon2id.ident().as_str() {
            return true;
        }
        match Params::try_from(&parsed) {
            Ok(stored) => {
                stored.m_cost() != self.params.memory_cost
                    || stored.t_cost() != self.params.time_cost
                    || stored.p_cost() != self.params.parallelism
                    || stored.output_len() != Some(self.params.hash_len as usize)
            }
            Err(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> PasswordService {
        PasswordService::new(Argon2Params::fast())
    }

    #[test]
    fn test_hash_and_verify() {
        let svc = service();
        let hash = svc.hash("Abcdef12").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("Abcdef12"));
        assert!(svc.verify("Abcdef12", &hash).unwrap());
        assert!(!svc.verify("abcdef12", &hash).unwrap());
        assert!(!svc.verify("", &hash).unwrap());
    }

    #[test]
    fn test_salts_differ() {
        let svc = service();
        let a = svc.hash("Abcdef12").unwrap();
        let b = svc.hash("Abcdef12").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        let svc = service();
        assert!(matches!(svc.verify("pw", "plaintext"), Err(Error::Hashing(_))));
    }

    #[test]
    fn test_verify_uses_params_from_hash() {
        let old = service();
        let hash = old.hash("Abcdef12").unwrap();

        let mut stronger = Argon2Params::fast();
        stronger.memory_cost = 2048;
        let new = PasswordService::new(stronger);
        assert!(new.verify("Abcdef12", &hash).unwrap());
    }

    #[test]
    fn test_needs_rehash() {
        let svc = service();
        let hash = svc.hash("Abcdef12").unwrap();
        assert!(!svc.needs_rehash(&hash));

        let mut stronger = Argon2Params::fast();
        stronger.time_cost = 2;
        assert!(PasswordService::new(stronger).needs_rehash(&hash));
        assert!(svc.needs_rehash("not a phc string"));
    }
}
