//! User domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered account as seen by callers
///
/// Carries every profile field but never the password credential; the
/// credential only exists inside [`super::StoredUser`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Record a successful login
    ///
    /// Never moves `last_login` backwards, even if the wall clock did.
    pub fn touch_login(&mut self, now: DateTime<Utc>) {
        self.last_login = Some(match self.last_login {
            Some(previous) if previous > now => previous,
            _ => now,
        });
    }
}

/// Account data for a new registration, already format-checked by the caller
#[derive(Clone, PartialEq, Eq)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

impl NewUser {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            phone: phone.into(),
            password: password.into(),
        }
    }
}

// Hand-written so the plaintext password never ends up in logs or panics.
impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_user() -> User {
        User {
            id: "user-123".to_string(),
            first_name: "Amy".to_string(),
            last_name: "Lee".to_string(),
            email: "amy@x.com".to_string(),
            phone: "555-1234".to_string(),
            created_at: Utc::now(),
            last_login: None,
        }
    }

    #[test]
    fn test_user_serializes_camel_case() {
        let user = sample_user();
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["firstName"], "Amy");
        assert_eq!(json["lastName"], "Lee");
        assert!(json["lastLogin"].is_null());
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_touch_login_is_monotonic() {
        let mut user = sample_user();
        let now = Utc::now();
        user.touch_login(now);
        assert_eq!(user.last_login, Some(now));

        user.touch_login(now - Duration::seconds(30));
        assert_eq!(user.last_login, Some(now));

        let later = now + Duration::seconds(5);
        user.touch_login(later);
        assert_eq!(user.last_login, Some(later));
    }

    #[test]
    fn test_new_user_debug_redacts_password() {
        let new_user = NewUser::new("Amy", "Lee", "amy@x.com", "555-1234", "Abcdef12");
        let debug = format!("{:?}", new_user);
        assert!(!debug.contains("Abcdef12"));
        assert!(debug.contains("<redacted>"));
    }
}
