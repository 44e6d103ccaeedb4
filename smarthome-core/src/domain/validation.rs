//! Form field validation
//!
//! Field rules for the signup and login forms. Validation runs before the
//! credential store is touched, and every failing field is reported at once
//! so a front-end can mark all of them in one pass.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::user::NewUser;

pub const MIN_NAME_LENGTH: usize = 2;
pub const MIN_PASSWORD_LENGTH: usize = 8;

fn name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-zA-Z\s]+$").expect("name pattern is valid"))
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"))
}

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\+?[0-9\s\-()]+$").expect("phone pattern is valid"))
}

/// A form field that can fail validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    FirstName,
    LastName,
    Email,
    Phone,
    Password,
    ConfirmPassword,
    Terms,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::FirstName => "firstName",
            Field::LastName => "lastName",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::Password => "password",
            Field::ConfirmPassword => "confirmPassword",
            Field::Terms => "terms",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One failing field and the message to show next to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

/// All field errors from one form submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a single-field error
    pub fn single(field: Field, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: Field, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Record the outcome of a field check
    fn check(&mut self, field: Field, outcome: Result<(), &'static str>) {
        if let Err(message) = outcome {
            self.push(field, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Message for a specific field, if it failed
    pub fn get(&self, field: Field) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

/// Check whether a string has the `local@domain.tld` shape
///
/// The string is tested as given, without trimming.
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// First or last name: required, at least two characters, letters and spaces
pub fn validate_name(value: &str) -> Result<(), &'static str> {
    let value = value.trim();
    if value.is_empty() {
        Err("This field is required")
    } else if value.chars().count() < MIN_NAME_LENGTH {
        Err("Must be at least 2 characters")
    } else if !name_regex().is_match(value) {
        Err("Only letters and spaces allowed")
    } else {
        Ok(())
    }
}

pub fn validate_email(value: &str) -> Result<(), &'static str> {
    let value = value.trim();
    if value.is_empty() {
        Err("Email is required")
    } else if !is_valid_email(value) {
        Err("Please enter a valid email address")
    } else {
        Ok(())
    }
}

pub fn validate_phone(value: &str) -> Result<(), &'static str> {
    let value = value.trim();
    if value.is_empty() {
        Err("Phone number is required")
    } else if !phone_regex().is_match(value) {
        Err("Please enter a valid phone number")
    } else {
        Ok(())
    }
}

/// Password strength: eight characters with a lowercase, an uppercase and a digit
///
/// Surrounding whitespace does not count towards the rules.
pub fn validate_password(value: &str) -> Result<(), &'static str> {
    let value = value.trim();
    if value.is_empty() {
        Err("Password is required")
    } else if value.chars().count() < MIN_PASSWORD_LENGTH {
        Err("Password must be at least 8 characters")
    } else if !(value.chars().any(|c| c.is_ascii_lowercase())
        && value.chars().any(|c| c.is_ascii_uppercase())
        && value.chars().any(|c| c.is_ascii_digit()))
    {
        Err("Password must contain uppercase, lowercase, and number")
    } else {
        Ok(())
    }
}

/// The trimmed confirmation must equal the password exactly as typed
pub fn validate_password_confirmation(password: &str, confirmation: &str) -> Result<(), &'static str> {
    let confirmation = confirmation.trim();
    if confirmation.is_empty() {
        Err("Please confirm your password")
    } else if confirmation != password {
        Err("Passwords do not match")
    } else {
        Ok(())
    }
}

/// Raw signup form input
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
    pub accept_terms: bool,
}

impl SignupForm {
    /// Validate every field and produce the trimmed account data
    pub fn validate(&self) -> Result<NewUser, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(Field::FirstName, validate_name(&self.first_name));
        errors.check(Field::LastName, validate_name(&self.last_name));
        errors.check(Field::Email, validate_email(&self.email));
        errors.check(Field::Phone, validate_phone(&self.phone));
        errors.check(Field::Password, validate_password(&self.password));
        errors.check(
            Field::ConfirmPassword,
            validate_password_confirmation(&self.password, &self.confirm_password),
        );
        if !self.accept_terms {
            errors.push(
                Field::Terms,
                "Please agree to the Terms of Service and Privacy Policy",
            );
        }
        errors.into_result()?;

        Ok(NewUser {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

/// Raw login form input
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for SignupForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupForm")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("accept_terms", &self.accept_terms)
            .finish_non_exhaustive()
    }
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Email format and a non-empty password; strength is not re-checked at login
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(Field::Email, validate_email(&self.email));
        if self.password.trim().is_empty() {
            errors.push(Field::Password, "Password is required");
        }
        errors.into_result()
    }

    /// The email as it will be looked up
    pub fn email(&self) -> &str {
        self.email.trim()
    }
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> SignupForm {
        SignupForm {
            first_name: "Amy".to_string(),
            last_name: "Lee".to_string(),
            email: "amy@x.com".to_string(),
            phone: "555-1234".to_string(),
            password: "Abcdef12".to_string(),
            confirm_password: "Abcdef12".to_string(),
            accept_terms: true,
        }
    }

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("amy@x.com"));
        assert!(is_valid_email("first.last@sub.example.org"));
        assert!(!is_valid_email("amy@x"));
        assert!(!is_valid_email("amy x@x.com"));
        assert!(!is_valid_email("@x.com"));
        assert!(!is_valid_email(" amy@x.com"));
    }

    #[test]
    fn test_name_rules() {
        assert_eq!(validate_name(""), Err("This field is required"));
        assert_eq!(validate_name("  "), Err("This field is required"));
        assert_eq!(validate_name("A"), Err("Must be at least 2 characters"));
        assert_eq!(validate_name("O'Neil"), Err("Only letters and spaces allowed"));
        assert_eq!(validate_name("Mary Ann"), Ok(()));
    }

    #[test]
    fn test_phone_rules() {
        assert_eq!(validate_phone("+1 (555) 123-4567"), Ok(()));
        assert_eq!(validate_phone("555-1234"), Ok(()));
        assert_eq!(validate_phone("555+1234"), Err("Please enter a valid phone number"));
        assert_eq!(validate_phone("call me"), Err("Please enter a valid phone number"));
        assert_eq!(validate_phone(""), Err("Phone number is required"));
    }

    #[test]
    fn test_password_rules() {
        assert_eq!(validate_password(""), Err("Password is required"));
        assert_eq!(validate_password("Ab1"), Err("Password must be at least 8 characters"));
        assert_eq!(
            validate_password("abcdefgh1"),
            Err("Password must contain uppercase, lowercase, and number")
        );
        assert_eq!(validate_password("Abcdef12"), Ok(()));
    }

    #[test]
    fn test_password_rules_ignore_padding() {
        assert_eq!(
            validate_password(" Abcdef1 "),
            Err("Password must be at least 8 characters")
        );
        assert_eq!(validate_password("  Abcdef12  "), Ok(()));
    }

    #[test]
    fn test_padded_password_does_not_confirm_itself() {
        assert_eq!(validate_password_confirmation("Abcdef12", " Abcdef12 "), Ok(()));
        assert_eq!(
            validate_password_confirmation(" Abcdef12 ", " Abcdef12 "),
            Err("Passwords do not match")
        );
        assert_eq!(
            validate_password_confirmation("Abcdef12", "   "),
            Err("Please confirm your password")
        );
    }

    #[test]
    fn test_signup_form_trims_fields() {
        let mut form = valid_form();
        form.first_name = "  Amy ".to_string();
        form.email = " amy@x.com ".to_string();

        let user = form.validate().unwrap();
        assert_eq!(user.first_name, "Amy");
        assert_eq!(user.email, "amy@x.com");
        assert_eq!(user.password, "Abcdef12");
    }

    #[test]
    fn test_signup_form_collects_every_error() {
        let form = SignupForm {
            first_name: "A".to_string(),
            email: "nope".to_string(),
            password: "Abcdef12".to_string(),
            confirm_password: "Abcdef13".to_string(),
            ..Default::default()
        };

        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get(Field::FirstName), Some("Must be at least 2 characters"));
        assert_eq!(errors.get(Field::LastName), Some("This field is required"));
        assert_eq!(errors.get(Field::Email), Some("Please enter a valid email address"));
        assert_eq!(errors.get(Field::Phone), Some("Phone number is required"));
        assert_eq!(errors.get(Field::Password), None);
        assert_eq!(errors.get(Field::ConfirmPassword), Some("Passwords do not match"));
        assert!(errors.get(Field::Terms).is_some());
        assert_eq!(errors.len(), 6);
    }

    #[test]
    fn test_login_form() {
        assert!(LoginForm::new("amy@x.com", "anything").validate().is_ok());

        let errors = LoginForm::new("amy", " ").validate().unwrap_err();
        assert_eq!(errors.get(Field::Email), Some("Please enter a valid email address"));
        assert_eq!(errors.get(Field::Password), Some("Password is required"));
        assert_eq!(LoginForm::new(" amy@x.com ", "pw").email(), "amy@x.com");
    }

    #[test]
    fn test_validation_errors_display() {
        let errors = ValidationErrors::single(Field::Email, "Email is required");
        assert_eq!(errors.to_string(), "email: Email is required");
    }
}
