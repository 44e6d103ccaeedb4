//! Users command - list registered accounts

use anyhow::Result;
use colored::Colorize;

use super::{get_context, get_logger, log_command};
use crate::output;

pub fn run(json: bool) -> Result<()> {
    log_command(&get_logger(), "users");
    let ctx = get_context()?;
    let users = ctx.credentials().list()?;

    if json {
        return output::print_json(&users);
    }

    if users.is_empty() {
        output::info("No accounts registered yet.");
        return Ok(());
    }

    let current_id = ctx.auth_service.current_user()?.map(|u| u.id);

    let mut table = output::create_table();
    table.set_header(vec!["", "Name", "Email", "Phone", "Created", "Last login"]);
    for user in &users {
        let marker = if current_id.as_deref() == Some(user.id.as_str()) {
            "*".green().to_string()
        } else {
            String::new()
        };
        table.add_row(vec![
            marker,
            user.full_name(),
            user.email.clone(),
            user.phone.clone(),
            output::format_datetime(&user.created_at),
            output::format_last_login(user.last_login.as_ref()),
        ]);
    }
    println!("{}", table);
    println!("{} account(s)", users.len());

    Ok(())
}
