//! Auth service - signup, login, logout and password-reset flows
//!
//! Each flow validates its form, calls into the credential store and leaves
//! the session in the right state. Callers turn the outcome into a
//! [`Notice`](crate::domain::Notice).

use serde::Serialize;
use tracing::debug;

use crate::domain::result::{Error, Result};
use crate::domain::validation::{validate_email, Field, ValidationErrors};
use crate::domain::{LoginForm, SessionState, SignupForm, User};

use super::CredentialStore;

/// Outcome of a password-reset request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PasswordReset {
    /// An account exists for the address
    InstructionsSent,
    /// No account uses the address
    UnknownAccount,
}

pub struct AuthService {
    credentials: CredentialStore,
}

impl AuthService {
    pub fn new(credentials: CredentialStore) -> Self {
        Self { credentials }
    }

    /// Direct access to the underlying store
    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Register a new account and log it in
    ///
    /// All field errors are reported together. The duplicate-email check
    /// runs only once the form itself is valid.
    pub fn sign_up(&self, form: &SignupForm) -> Result<User> {
        let new_user = form.validate()?;
        let user = self.credentials.create(new_user)?;
        self.credentials.set_session(&user)?;
        Ok(user)
    }

    /// Check credentials and start a session
    pub fn log_in(&self, form: &LoginForm) -> Result<User> {
        form.validate()?;
        let user = self.credentials.authenticate(form.email(), &form.password)?;
        self.credentials.set_session(&user)?;
        Ok(user)
    }

    /// End the session, returning who was logged in
    pub fn log_out(&self) -> Result<Option<User>> {
        let previous = self.credentials.current_session()?;
        self.credentials.clear_session()?;
        Ok(previous)
    }

    pub fn current_user(&self) -> Result<Option<User>> {
        self.credentials.current_session()
    }

    pub fn session_state(&self) -> Result<SessionState> {
        self.credentials.session_state()
    }

    /// Whether an email is free to register
    pub fn is_email_available(&self, email: &str) -> Result<bool> {
        Ok(self.credentials.find_by_email(email.trim())?.is_none())
    }

    /// Look up the account behind a password-reset request
    ///
    /// Only reports whether the account exists; nothing is sent anywhere.
    pub fn request_password_reset(&self, email: &str) -> Result<PasswordReset> {
        let email = email.trim();
        validate_email(email).map_err(|msg| {
            Error::Validation(ValidationErrors::single(Field::Email, msg))
        })?;

        let outcome = match self.credentials.find_by_email(email)? {
            Some(_) => PasswordReset::InstructionsSent,
            None => PasswordReset::UnknownAccount,
        };
        debug!(?outcome, "password reset requested");
        Ok(outcome)
    }
}
