//! Session state

use serde::{Deserialize, Serialize};

use super::user::User;

/// Who, if anyone, is logged in on this profile
///
/// The authenticated variant holds a snapshot taken when the session was
/// set; later changes to the stored record do not flow into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "user", rename_all = "camelCase")]
pub enum SessionState {
    Anonymous,
    Authenticated(User),
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            SessionState::Anonymous => None,
        }
    }
}

impl From<Option<User>> for SessionState {
    fn from(user: Option<User>) -> Self {
        match user {
            Some(user) => SessionState::Authenticated(user),
            None => SessionState::Anonymous,
        }
    }
}
