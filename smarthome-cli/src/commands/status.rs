//! Status command - show who is logged in

use anyhow::Result;
use colored::Colorize;

use smarthome_core::SessionState;

use super::{get_context, get_logger, log_command};
use crate::output;

pub fn run(json: bool) -> Result<()> {
    log_command(&get_logger(), "status");
    let ctx = get_context()?;
    let state = ctx.auth_service.session_state()?;

    if json {
        return output::print_json(&state);
    }

    println!(
        "{} {} ({} storage)",
        "Profile:".dimmed(),
        ctx.profile_dir.display(),
        ctx.credentials().backend_name()
    );
    println!();

    match state {
        SessionState::Anonymous => {
            output::warning("Not logged in. Use 'smarthome login' or 'smarthome signup'.");
        }
        SessionState::Authenticated(user) => {
            println!("{}", "Logged in".bold());
            println!();

            let mut table = output::create_table();
            table.add_row(vec!["Name", &user.full_name()]);
            table.add_row(vec!["Email", &user.email]);
            table.add_row(vec!["Phone", &user.phone]);
            table.add_row(vec!["Member since", &output::format_datetime(&user.created_at)]);
            table.add_row(vec![
                "Last login",
                &output::format_last_login(user.last_login.as_ref()),
            ]);
            println!("{}", table);
        }
    }

    Ok(())
}
