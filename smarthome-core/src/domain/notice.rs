//! User-facing notices
//!
//! Every auth outcome ends up as a short transient message. Front-ends
//! decide how to show it (toast, colored line, JSON field).

use serde::{Deserialize, Serialize};

use super::result::Error;
use super::user::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }

    pub fn account_created() -> Self {
        Self::success("Account created successfully! Welcome to SmartHome.")
    }

    pub fn welcome_back(user: &User) -> Self {
        Self::success(format!("Welcome back, {}!", user.first_name))
    }

    pub fn logged_out() -> Self {
        Self::success("Logged out successfully!")
    }

    pub fn reset_instructions_sent() -> Self {
        Self::success("Password reset instructions sent to your email!")
    }

    pub fn unknown_account() -> Self {
        Self::error("No account found with this email address.")
    }

    /// Map a failure to the message shown to the user
    ///
    /// Validation failures show the first field message; storage and
    /// internal failures collapse to a generic message.
    pub fn from_error(err: &Error) -> Self {
        match err {
            Error::DuplicateEmail { .. } => Self::error("Email already exists"),
            Error::UserNotFound { .. } => Self::error("User not found"),
            Error::InvalidPassword => Self::error("Invalid password"),
            Error::Validation(errors) => Self::error(
                errors
                    .iter()
                    .next()
                    .map(|e| e.message.clone())
                    .unwrap_or_else(|| "Please check the form and try again".to_string()),
            ),
            _ => Self::error("Something went wrong. Please try again."),
        }
    }
}

impl Notice {
    /// Map a signup failure to the message shown on the signup form
    ///
    /// A taken email is reported the way the form words it; everything
    /// else reads as in [`Notice::from_error`].
    pub fn from_signup_error(err: &Error) -> Self {
        match err {
            Error::DuplicateEmail { .. } => {
                Self::error("An account with this email already exists")
            }
            other => Self::from_error(other),
        }
    }
}

impl From<&Error> for Notice {
    fn from(err: &Error) -> Self {
        Notice::from_error(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validation::{Field, ValidationErrors};

    #[test]
    fn test_error_notices() {
        let dup = Error::DuplicateEmail {
            email: "amy@x.com".to_string(),
        };
        assert_eq!(Notice::from_error(&dup).message, "Email already exists");
        assert!(Notice::from_error(&dup).is_error());

        assert_eq!(Notice::from_error(&Error::InvalidPassword).message, "Invalid password");

        let validation = Error::Validation(ValidationErrors::single(
            Field::Email,
            "Please enter a valid email address",
        ));
        assert_eq!(
            Notice::from(&validation).message,
            "Please enter a valid email address"
        );

        let storage = Error::storage("disk full");
        assert!(!Notice::from_error(&storage).message.contains("disk"));
    }

    #[test]
    fn test_signup_duplicate_uses_form_wording() {
        let dup = Error::DuplicateEmail {
            email: "amy@x.com".to_string(),
        };
        let notice = Notice::from_signup_error(&dup);
        assert!(notice.is_error());
        assert_eq!(notice.message, "An account with this email already exists");

        assert_eq!(
            Notice::from_signup_error(&Error::InvalidPassword),
            Notice::from_error(&Error::InvalidPassword)
        );
    }

    #[test]
    fn test_notice_serialization() {
        let json = serde_json::to_value(Notice::logged_out()).unwrap();
        assert_eq!(json["level"], "success");
        assert_eq!(json["message"], "Logged out successfully!");
    }
}
