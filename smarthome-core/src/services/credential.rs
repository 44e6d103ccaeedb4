//! Credential store - registered users and the current session
//!
//! Owns two entries in the injected key-value store:
//! - `smarthome_users`: the whole user collection, in insertion order
//! - `smarthome_current_user`: a snapshot of the logged-in user, if any
//!
//! Every mutation rewrites the affected entry in full. That is fine for a
//! single-profile account list and nothing more.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::{NewUser, SessionState, StoredUser, User};
use crate::ports::KeyValueStore;

use super::PasswordService;

/// Storage key for the user collection
pub const USERS_KEY: &str = "smarthome_users";

/// Storage key for the session snapshot
pub const CURRENT_USER_KEY: &str = "smarthome_current_user";

pub struct CredentialStore {
    storage: Arc<dyn KeyValueStore>,
    passwords: PasswordService,
    rehash_on_login: bool,
}

impl CredentialStore {
    pub fn new(storage: Arc<dyn KeyValueStore>, passwords: PasswordService) -> Self {
        Self {
            storage,
            passwords,
            rehash_on_login: true,
        }
    }

    /// Enable or disable upgrading outdated hashes on successful login
    pub fn with_rehash_on_login(mut self, enabled: bool) -> Self {
        self.rehash_on_login = enabled;
        self
    }

    /// Name of the backing storage (for status output)
    pub fn backend_name(&self) -> &str {
        self.storage.name()
    }

    fn load_records(&self) -> Result<Vec<StoredUser>> {
        match self.storage.get(USERS_KEY)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    fn save_records(&self, records: &[StoredUser]) -> Result<()> {
        let raw = serde_json::to_string(records)?;
        self.storage.set(USERS_KEY, &raw)
    }

    /// All registered users in insertion order
    pub fn list(&self) -> Result<Vec<User>> {
        Ok(self
            .load_records()?
            .into_iter()
            .map(|record| record.user)
            .collect())
    }

    /// Exact (case-sensitive) email lookup
    pub fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .load_records()?
            .into_iter()
            .find(|record| record.user.email == email)
            .map(|record| record.user))
    }

    /// Register a new user
    ///
    /// Fails with `DuplicateEmail` without touching storage if the email is
    /// already taken.
    pub fn create(&self, new_user: NewUser) -> Result<User> {
        let mut records = self.load_records()?;

        if records.iter().any(|r| r.user.email == new_user.email) {
            debug!(users = records.len(), "rejected duplicate registration");
            return Err(Error::DuplicateEmail {
                email: new_user.email,
            });
        }

        let taken: HashSet<&str> = records.iter().map(|r| r.user.id.as_str()).collect();
        let id = loop {
            let candidate = Uuid::now_v7().to_string();
            if !taken.contains(candidate.as_str()) {
                break candidate;
            }
        };

        let password_hash = self.passwords.hash(&new_user.password)?;
        let user = User {
            id,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            email: new_user.email,
            phone: new_user.phone,
            created_at: Utc::now(),
            last_login: None,
        };

        records.push(StoredUser::new(user.clone(), password_hash));
        self.save_records(&records)?;

        info!(user_id = %user.id, users = records.len(), "user registered");
        Ok(user)
    }

    /// Verify credentials and record the login time
    ///
    /// A wrong password leaves the stored record untouched.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<User> {
        let mut records = self.load_records()?;

        let record = records
            .iter_mut()
            .find(|r| r.user.email == email)
            .ok_or_else(|| Error::UserNotFound {
                email: email.to_string(),
            })?;

        if !self.passwords.verify(password, &record.password_hash)? {
            debug!(user_id = %record.user.id, "password mismatch");
            return Err(Error::InvalidPassword);
        }

        if self.rehash_on_login && self.passwords.needs_rehash(&record.password_hash) {
            record.password_hash = self.passwords.hash(password)?;
            info!(user_id = %record.user.id, "upgraded password hash parameters");
        }

        record.user.touch_login(Utc::now());
        let user = record.user.clone();
        self.save_records(&records)?;

        info!(user_id = %user.id, "user authenticated");
        Ok(user)
    }

    /// The session snapshot, if someone is logged in
    ///
    /// An unreadable session entry counts as no session; the next
    /// `set_session` overwrites it.
    pub fn current_session(&self) -> Result<Option<User>> {
        let Some(raw) = self.storage.get(CURRENT_USER_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                warn!(error = %e, "ignoring unreadable session entry");
                Ok(None)
            }
        }
    }

    /// Replace the session with a snapshot of `user`
    pub fn set_session(&self, user: &User) -> Result<()> {
        let raw = serde_json::to_string(user)?;
        self.storage.set(CURRENT_USER_KEY, &raw)?;
        debug!(user_id = %user.id, "session set");
        Ok(())
    }

    pub fn clear_session(&self) -> Result<()> {
        self.storage.remove(CURRENT_USER_KEY)?;
        debug!("session cleared");
        Ok(())
    }

    pub fn session_state(&self) -> Result<SessionState> {
        Ok(self.current_session()?.into())
    }

    pub fn is_logged_in(&self) -> Result<bool> {
        Ok(self.current_session()?.is_some())
    }
}
