//! SmartHome Core - account logic for the SmartHome demo site
//!
//! This crate implements the credential store and login flow following
//! hexagonal architecture:
//!
//! - **domain**: Core entities (User, SessionState, form validation, notices)
//! - **ports**: Trait definitions for external dependencies (KeyValueStore)
//! - **services**: Business logic orchestration (credentials, auth flows, logging)
//! - **adapters**: Concrete implementations (filesystem and in-memory storage)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use adapters::FileStore;
use config::Config;
use ports::KeyValueStore;
use services::*;

// Re-export commonly used types at crate root
pub use domain::{
    is_valid_email, Argon2Params, LoginForm, NewUser, Notice, NoticeLevel, SessionState,
    SignupForm, User, ValidationErrors,
};
pub use domain::result::{Error, OperationResult};
pub use services::{EntryPoint, LogEvent, LoggingService, PasswordReset};

/// Main context for SmartHome account operations
///
/// This is the primary entry point for all business logic. It holds the
/// profile storage, configuration, and services for one profile directory.
pub struct SmartHomeContext {
    pub config: Config,
    pub profile_dir: PathBuf,
    pub storage: Arc<FileStore>,
    pub auth_service: AuthService,
}

impl SmartHomeContext {
    /// Create a context for the profile stored in `profile_dir`
    pub fn new(profile_dir: &Path) -> Result<Self> {
        let config = Config::load(profile_dir)?;

        let storage = Arc::new(
            FileStore::open(profile_dir)
                .with_context(|| format!("Failed to open profile storage: {:?}", profile_dir))?,
        );

        let auth_service = Self::build_auth_service(storage.clone(), &config);

        Ok(Self {
            config,
            profile_dir: profile_dir.to_path_buf(),
            storage,
            auth_service,
        })
    }

    /// Wire the auth flows over any storage backend
    pub fn build_auth_service(storage: Arc<dyn KeyValueStore>, config: &Config) -> AuthService {
        let passwords = PasswordService::new(config.hash_params());
        let credentials =
            CredentialStore::new(storage, passwords).with_rehash_on_login(config.rehash_on_login);
        AuthService::new(credentials)
    }

    /// The credential store behind the auth flows
    pub fn credentials(&self) -> &CredentialStore {
        self.auth_service.credentials()
    }
}
