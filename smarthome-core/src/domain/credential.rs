//! Credential domain models

use serde::{Deserialize, Serialize};

use super::user::User;

/// Default Argon2id parameters (OWASP interactive-login profile)
pub const DEFAULT_TIME_COST: u32 = 2;
pub const DEFAULT_MEMORY_COST: u32 = 19456; // 19 MiB
pub const DEFAULT_PARALLELISM: u32 = 1;
pub const DEFAULT_HASH_LEN: u32 = 32;

/// Argon2id parameters for password hashing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Argon2Params {
    pub time_cost: u32,
    /// Memory in KiB
    pub memory_cost: u32,
    pub parallelism: u32,
    pub hash_len: u32,
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            time_cost: DEFAULT_TIME_COST,
            memory_cost: DEFAULT_MEMORY_COST,
            parallelism: DEFAULT_PARALLELISM,
            hash_len: DEFAULT_HASH_LEN,
        }
    }
}

impl Argon2Params {
    /// Minimal-cost parameters for tests and CI runs
    pub fn fast() -> Self {
        Self {
            time_cost: 1,
            memory_cost: 1024,
            parallelism: 1,
            hash_len: DEFAULT_HASH_LEN,
        }
    }
}

/// A user record as persisted in the users collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredUser {
    #[serde(flatten)]
    pub user: User,
    /// Argon2id PHC string
    pub password_hash: String,
}

impl StoredUser {
    pub fn new(user: User, password_hash: String) -> Self {
        Self { user, password_hash }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_default_params() {
        let params = Argon2Params::default();
        assert_eq!(params.memory_cost, 19456);
        assert_eq!(params.time_cost, 2);
        assert_ne!(params, Argon2Params::fast());
    }

    #[test]
    fn test_stored_user_layout_is_flat() {
        let stored = StoredUser::new(
            User {
                id: "u1".to_string(),
                first_name: "Amy".to_string(),
                last_name: "Lee".to_string(),
                email: "amy@x.com".to_string(),
                phone: "555-1234".to_string(),
                created_at: Utc::now(),
                last_login: None,
            },
            "$argon2id$v=19$m=1024,t=1,p=1$c2FsdA$aGFzaA".to_string(),
        );

        let json = serde_json::to_value(&stored).unwrap();
        assert_eq!(json["email"], "amy@x.com");
        assert!(json["passwordHash"].as_str().unwrap().starts_with("$argon2id$"));
        assert!(json.get("password").is_none());

        let back: StoredUser = serde_json::from_value(json).unwrap();
        assert_eq!(back, stored);
    }
}
