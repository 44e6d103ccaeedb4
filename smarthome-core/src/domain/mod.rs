//! Core domain entities
//!
//! All account entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

mod credential;
mod notice;
mod session;
mod user;
pub mod result;
pub mod validation;

pub use credential::{Argon2Params, StoredUser};
pub use notice::{Notice, NoticeLevel};
pub use session::SessionState;
pub use user::{NewUser, User};
pub use validation::{is_valid_email, Field, FieldError, LoginForm, SignupForm, ValidationErrors};
