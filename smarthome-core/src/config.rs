//! Configuration management
//!
//! Profile settings live in `settings.json` inside the profile directory:
//! ```json
//! {
//!   "auth": {
//!     "argon2": { "timeCost": 2, "memoryCost": 19456, "parallelism": 1, "hashLen": 32 },
//!     "rehashOnLogin": true
//!   }
//! }
//! ```
//! Keys the library does not manage are preserved on save.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::Argon2Params;

const SETTINGS_FILE: &str = "settings.json";

/// Environment override selecting lightweight hashing (for CI/testing)
pub const FAST_HASH_ENV: &str = "SMARTHOME_FAST_HASH";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    auth: AuthSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthSettings {
    #[serde(default)]
    argon2: Argon2Params,
    #[serde(default = "default_rehash_on_login")]
    rehash_on_login: bool,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

fn default_rehash_on_login() -> bool {
    true
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            argon2: Argon2Params::default(),
            rehash_on_login: default_rehash_on_login(),
            other: HashMap::new(),
        }
    }
}

fn parse_bool_env(name: &str) -> Option<bool> {
    match std::env::var(name).ok().as_deref() {
        Some("true" | "1" | "yes" | "TRUE" | "YES") => Some(true),
        Some("false" | "0" | "no" | "FALSE" | "NO") => Some(false),
        _ => None,
    }
}

/// Profile configuration (simplified view of settings)
#[derive(Debug, Clone)]
pub struct Config {
    pub argon2: Argon2Params,
    pub rehash_on_login: bool,
    /// Set from `SMARTHOME_FAST_HASH`; never written back to disk
    pub fast_hash: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            argon2: Argon2Params::default(),
            rehash_on_login: default_rehash_on_login(),
            fast_hash: false,
        }
    }
}

impl Config {
    /// Load config from the profile directory
    ///
    /// A missing or unparseable settings file yields defaults. Argon2
    /// parameters that the hasher would reject are an error.
    pub fn load(profile_dir: &Path) -> Result<Self> {
        let settings_path = profile_dir.join(SETTINGS_FILE);

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)
                .with_context(|| format!("Failed to read {:?}", settings_path))?;
            serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!(error = %e, "settings.json is malformed, using defaults");
                SettingsFile::default()
            })
        } else {
            SettingsFile::default()
        };

        let config = Self {
            argon2: raw.auth.argon2,
            rehash_on_login: raw.auth.rehash_on_login,
            fast_hash: parse_bool_env(FAST_HASH_ENV).unwrap_or(false),
        };
        config.check_argon2()?;
        Ok(config)
    }

    fn check_argon2(&self) -> Result<()> {
        let p = &self.argon2;
        argon2::Params::new(p.memory_cost, p.time_cost, p.parallelism, Some(p.hash_len as usize))
            .map_err(|e| anyhow::anyhow!("Invalid auth.argon2 settings: {}", e))?;
        Ok(())
    }

    /// Save config to the profile directory
    /// Preserves other settings the library doesn't manage
    pub fn save(&self, profile_dir: &Path) -> Result<()> {
        let settings_path = profile_dir.join(SETTINGS_FILE);

        // Load existing settings to preserve fields we don't manage
        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str::<SettingsFile>(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        settings.auth.argon2 = self.argon2;
        settings.auth.rehash_on_login = self.rehash_on_login;

        std::fs::create_dir_all(profile_dir)?;
        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }

    /// Hashing parameters actually in effect
    pub fn hash_params(&self) -> Argon2Params {
        if self.fast_hash {
            Argon2Params::fast()
        } else {
            self.argon2
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_settings_use_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.argon2, Argon2Params::default());
        assert!(config.rehash_on_login);
    }

    #[test]
    fn test_malformed_settings_use_defaults() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), "{ nope").unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.argon2, Argon2Params::default());
    }

    #[test]
    fn test_partial_argon2_settings_fill_defaults() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILE),
            r#"{ "auth": { "argon2": { "timeCost": 3 }, "rehashOnLogin": false } }"#,
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.argon2.time_cost, 3);
        assert_eq!(config.argon2.memory_cost, Argon2Params::default().memory_cost);
        assert!(!config.rehash_on_login);
    }

    #[test]
    fn test_invalid_argon2_settings_are_rejected() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILE),
            r#"{ "auth": { "argon2": { "memoryCost": 1 } } }"#,
        )
        .unwrap();
        assert!(Config::load(dir.path()).is_err());
    }

    #[test]
    fn test_save_preserves_unmanaged_settings() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILE),
            r#"{ "theme": "dark", "auth": { "remember": true } }"#,
        )
        .unwrap();

        let mut config = Config::load(dir.path()).unwrap();
        config.argon2 = Argon2Params::fast();
        config.save(dir.path()).unwrap();

        let raw: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join(SETTINGS_FILE)).unwrap(),
        )
        .unwrap();
        assert_eq!(raw["theme"], "dark");
        assert_eq!(raw["auth"]["remember"], true);
        assert_eq!(raw["auth"]["argon2"]["memoryCost"], 1024);

        let reloaded = Config::load(dir.path()).unwrap();
        assert_eq!(reloaded.argon2, Argon2Params::fast());
    }

    // Only this test touches the variable; other tests never assert on fast_hash
    #[test]
    fn test_fast_hash_env_override() {
        let dir = tempdir().unwrap();
        let cases = [
            ("true", true),
            ("1", true),
            ("yes", true),
            ("YES", true),
            ("false", false),
            ("0", false),
            ("no", false),
            ("maybe", false),
            ("", false),
        ];

        for (value, expected) in cases {
            std::env::set_var(FAST_HASH_ENV, value);
            let config = Config::load(dir.path()).unwrap();
            assert_eq!(config.fast_hash, expected, "{}={:?}", FAST_HASH_ENV, value);
            let params = config.hash_params();
            if expected {
                assert_eq!(params, Argon2Params::fast());
            } else {
                assert_eq!(params, Argon2Params::default());
            }
        }

        std::env::remove_var(FAST_HASH_ENV);
        assert!(!Config::load(dir.path()).unwrap().fast_hash);
    }

    #[test]
    fn test_fast_hash_is_not_saved() {
        let dir = tempdir().unwrap();
        let config = Config {
            fast_hash: true,
            ..Config::default()
        };
        config.save(dir.path()).unwrap();

        let raw = std::fs::read_to_string(dir.path().join(SETTINGS_FILE)).unwrap();
        assert!(!raw.contains("fast"));
    }

    #[test]
    fn test_hash_params_respects_fast_flag() {
        let mut config = Config::default();
        assert_eq!(config.hash_params(), Argon2Params::default());
        config.fast_hash = true;
        assert_eq!(config.hash_params(), Argon2Params::fast());
    }
}
