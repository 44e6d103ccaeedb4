//! Output formatting utilities

use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Local, TimeZone, Utc};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use smarthome_core::{Notice, OperationResult};

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Print a notice in its level's color
pub fn notice(notice: &Notice) {
    if notice.is_error() {
        error(&notice.message);
    } else {
        success(&notice.message);
    }
}

/// JSON shape for auth command results
#[derive(Debug, Serialize)]
pub struct Outcome<T: Serialize> {
    pub notice: Notice,
    #[serde(flatten)]
    pub result: OperationResult<T>,
}

impl<T: Serialize> Outcome<T> {
    pub fn new(notice: Notice, result: OperationResult<T>) -> Self {
        Self { notice, result }
    }
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Spinner shown while a password is hashed or verified
///
/// Hidden when stdout is not a terminal so piped output stays clean.
pub fn spinner(msg: &str) -> ProgressBar {
    if atty::isnt(atty::Stream::Stdout) {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Format a unix-millisecond timestamp for display
pub fn format_timestamp(timestamp_ms: i64) -> String {
    Utc.timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| timestamp_ms.to_string())
}

/// Format a stored instant in the local timezone
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// Format an optional last-login instant
pub fn format_last_login(dt: Option<&DateTime<Utc>>) -> String {
    dt.map(format_datetime).unwrap_or_else(|| "never".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00:00");
        assert_eq!(format_timestamp(1_700_000_000_000), "2023-11-14 22:13:20");
    }

    #[test]
    fn test_format_last_login_never() {
        assert_eq!(format_last_login(None), "never");
    }

    #[test]
    fn test_outcome_json_shape() {
        let outcome = Outcome::new(
            Notice::error("Invalid password"),
            OperationResult::<u32>::fail("Invalid password"),
        );
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["notice"]["level"], "error");
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Invalid password");
    }
}
