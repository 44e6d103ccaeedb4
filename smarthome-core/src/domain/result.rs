//! Result and error types for the core library

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::validation::ValidationErrors;

/// Core library error type
///
/// The first four variants are the recoverable auth outcomes a front-end
/// turns into a notice; the rest are infrastructure failures.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Email already exists")]
    DuplicateEmail { email: String },

    #[error("User not found")]
    UserNotFound { email: String },

    #[error("Invalid password")]
    InvalidPassword,

    #[error("Validation error: {0}")]
    Validation(ValidationErrors),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Password hashing error: {0}")]
    Hashing(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a hashing error
    pub fn hashing(msg: impl Into<String>) -> Self {
        Self::Hashing(msg.into())
    }

    /// Whether this is an expected auth outcome rather than a fault
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Error::DuplicateEmail { .. }
                | Error::UserNotFound { .. }
                | Error::InvalidPassword
                | Error::Validation(_)
        )
    }
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

/// Operation result with optional context (for JSON output)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub context: Option<HashMap<String, serde_json::Value>>,
}

impl<T> OperationResult<T> {
    /// Create a successful result
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            context: None,
        }
    }

    /// Create a failed result
    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            context: None,
        }
    }

    /// Create a failed result with context
    pub fn fail_with_context(
        error: impl Into<String>,
        context: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            context: Some(context),
        }
    }
}

impl<T> From<Result<T>> for OperationResult<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(Error::Validation(errors)) => {
                // Field errors go into context so a form can mark each field
                let context = errors
                    .iter()
                    .map(|e| (e.field.to_string(), serde_json::Value::from(e.message.clone())))
                    .collect();
                Self::fail_with_context(Error::Validation(errors).to_string(), context)
            }
            Err(e) => Self::fail(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validation::Field;

    #[test]
    fn test_operation_result_ok() {
        let result: OperationResult<i32> = OperationResult::ok(42);
        assert!(result.success);
        assert_eq!(result.data, Some(42));
        assert!(result.error.is_none());
    }

    #[test]
    fn test_operation_result_fail() {
        let result: OperationResult<i32> = OperationResult::fail("Something went wrong");
        assert!(!result.success);
        assert!(result.data.is_none());
        assert_eq!(result.error, Some("Something went wrong".to_string()));
    }

    #[test]
    fn test_from_result() {
        let ok: Result<i32> = Ok(42);
        let result: OperationResult<i32> = ok.into();
        assert!(result.success);

        let err: Result<i32> = Err(Error::InvalidPassword);
        let result: OperationResult<i32> = err.into();
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Invalid password"));
    }

    #[test]
    fn test_validation_result_carries_fields() {
        let err: Result<()> = Err(Error::Validation(ValidationErrors::single(
            Field::Phone,
            "Phone number is required",
        )));
        let result: OperationResult<()> = err.into();
        let context = result.context.unwrap();
        assert_eq!(context["phone"], "Phone number is required");
        assert!(result.error.unwrap().contains("Validation error"));
    }

    #[test]
    fn test_user_facing_classification() {
        assert!(Error::InvalidPassword.is_user_facing());
        assert!(Error::UserNotFound { email: "a@b.co".to_string() }.is_user_facing());
        assert!(!Error::storage("locked").is_user_facing());
    }
}
