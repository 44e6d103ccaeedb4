//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case or feature area.

mod auth;
mod credential;
pub mod logging;
mod password;

pub use auth::{AuthService, PasswordReset};
pub use credential::{CredentialStore, CURRENT_USER_KEY, USERS_KEY};
pub use logging::{EntryPoint, LogEntry, LogEvent, LoggingService};
pub use password::PasswordService;
