//! Logout command - end the current session

use anyhow::Result;

use smarthome_core::{LogEvent, Notice, OperationResult};

use super::{get_context, get_logger, log_event};
use crate::output::{self, Outcome};

pub fn run(json: bool) -> Result<()> {
    let logger = get_logger();
    let ctx = get_context()?;

    // Logging out with no session is not an error
    let previous = ctx.auth_service.log_out()?;
    log_event(&logger, LogEvent::new("logout_completed").with_command("logout"));

    let notice = Notice::logged_out();
    if json {
        let result = OperationResult::ok(serde_json::json!({
            "wasLoggedIn": previous.is_some(),
        }));
        output::print_json(&Outcome::new(notice, result))?;
    } else {
        output::notice(&notice);
    }
    Ok(())
}
