//! Login command - check credentials and start a session

use anyhow::Result;

use smarthome_core::{LoginForm, Notice};

use super::{finish, get_context, get_logger, password_or_prompt, text_or_prompt};
use crate::output;

pub fn run(email: Option<String>, password: Option<String>, json: bool) -> Result<()> {
    let logger = get_logger();
    let ctx = get_context()?;

    let email = text_or_prompt(email, "Email", "email")?;
    let password = password_or_prompt(password, "Password")?;
    let form = LoginForm::new(email, password);

    let pb = output::spinner("Signing in...");
    let result = ctx.auth_service.log_in(&form);
    pb.finish_and_clear();

    finish(&logger, "login", result, Notice::welcome_back, Notice::from_error, json)
}
