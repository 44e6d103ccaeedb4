//! CLI command implementations

pub mod forgot_password;
pub mod login;
pub mod logout;
pub mod logs;
pub mod signup;
pub mod status;
pub mod users;

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use dialoguer::{Input, Password};
use serde::Serialize;

use smarthome_core::{
    EntryPoint, Error, LogEvent, LoggingService, Notice, OperationResult, SmartHomeContext,
};

use crate::output::{self, Outcome};

/// Profile directory override
const PROFILE_DIR_ENV: &str = "SMARTHOME_DIR";

/// Password supplied non-interactively
const PASSWORD_ENV: &str = "SMARTHOME_PASSWORD";

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<LoggingService> {
    let profile_dir = get_profile_dir().ok()?;
    LoggingService::new(&profile_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Record that a read-only command ran
pub fn log_command(logger: &Option<LoggingService>, command: &str) {
    if let Some(l) = logger {
        let _ = l.log_command(command);
    }
}

/// Get the profile directory from environment or default
pub fn get_profile_dir() -> Result<PathBuf> {
    if let Ok(dir) = env::var(PROFILE_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".smarthome"))
        .context("Could not find home directory; set SMARTHOME_DIR")
}

/// Open the profile context
pub fn get_context() -> Result<SmartHomeContext> {
    let profile_dir = get_profile_dir()?;
    SmartHomeContext::new(&profile_dir).context("Failed to initialize SmartHome profile")
}

fn interactive() -> bool {
    atty::is(atty::Stream::Stdin) && atty::is(atty::Stream::Stdout)
}

/// Use the flag value, or prompt for it on a terminal
pub fn text_or_prompt(value: Option<String>, prompt: &str, flag: &str) -> Result<String> {
    if let Some(v) = value {
        return Ok(v);
    }
    if !interactive() {
        anyhow::bail!("--{} is required when not running interactively", flag);
    }
    let v: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;
    Ok(v)
}

/// Get password from --password flag, SMARTHOME_PASSWORD env var, or prompt
pub fn password_or_prompt(password_flag: Option<String>, prompt: &str) -> Result<String> {
    if let Some(p) = password_flag {
        return Ok(p);
    }
    if let Ok(p) = env::var(PASSWORD_ENV) {
        return Ok(p);
    }
    if !interactive() {
        anyhow::bail!("--password or {} is required when not running interactively", PASSWORD_ENV);
    }
    let p = Password::new()
        .with_prompt(prompt)
        .allow_empty_password(true)
        .interact()?;
    Ok(p)
}

/// Get a password and its confirmation
///
/// A flag or env value confirms itself. Interactive entries are returned
/// as typed; a mismatch is reported by form validation.
pub fn password_with_confirm(password_flag: Option<String>) -> Result<(String, String)> {
    if password_flag.is_some() || env::var(PASSWORD_ENV).is_ok() {
        let p = password_or_prompt(password_flag, "Password")?;
        return Ok((p.clone(), p));
    }
    let p1 = password_or_prompt(None, "Password")?;
    let p2 = password_or_prompt(None, "Confirm password")?;
    Ok((p1, p2))
}

/// Report an auth outcome and log it
///
/// Success prints the notice (or JSON). User-facing failures are shown as
/// a red notice built by `on_error` and end the process with a non-zero
/// status; any other failure is returned to `main`.
pub fn finish<T: Serialize>(
    logger: &Option<LoggingService>,
    command: &str,
    result: smarthome_core::domain::result::Result<T>,
    on_success: impl FnOnce(&T) -> Notice,
    on_error: fn(&Error) -> Notice,
    json: bool,
) -> Result<()> {
    match result {
        Ok(data) => {
            log_event(
                logger,
                LogEvent::new(format!("{}_completed", command)).with_command(command),
            );
            let notice = on_success(&data);
            if json {
                output::print_json(&Outcome::new(notice, OperationResult::ok(data)))?;
            } else {
                output::notice(&notice);
            }
            Ok(())
        }
        Err(e) if e.is_user_facing() => {
            // Error messages carry no account data, only the outcome
            log_event(
                logger,
                LogEvent::new(format!("{}_failed", command))
                    .with_command(command)
                    .with_error(e.to_string()),
            );
            let notice = on_error(&e);
            if json {
                output::print_json(&Outcome::new(notice, OperationResult::<T>::from(Err(e))))?;
            } else {
                output::notice(&notice);
                if let Error::Validation(errors) = &e {
                    for field_error in errors.iter().skip(1) {
                        output::error(&format!("  {}: {}", field_error.field, field_error.message));
                    }
                }
            }
            std::process::exit(1);
        }
        Err(e) => {
            log_event(
                logger,
                LogEvent::new(format!("{}_failed", command))
                    .with_command(command)
                    .with_error(e.to_string())
                    .with_error_details(format!("{:?}", e)),
            );
            Err(e.into())
        }
    }
}
