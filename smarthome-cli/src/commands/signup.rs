//! Signup command - register a new account and log it in

use anyhow::Result;
use clap::Args;
use dialoguer::Confirm;

use smarthome_core::{Notice, SignupForm};

use super::{finish, get_context, get_logger, password_with_confirm, text_or_prompt};
use crate::output;

#[derive(Args)]
pub struct SignupArgs {
    /// First name
    #[arg(long)]
    pub first_name: Option<String>,
    /// Last name
    #[arg(long)]
    pub last_name: Option<String>,
    /// Email address
    #[arg(long)]
    pub email: Option<String>,
    /// Phone number
    #[arg(long)]
    pub phone: Option<String>,
    /// Password (or set SMARTHOME_PASSWORD)
    #[arg(long)]
    pub password: Option<String>,
    /// Agree to the Terms of Service and Privacy Policy
    #[arg(long)]
    pub accept_terms: bool,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

fn ask_terms(accepted: bool) -> Result<bool> {
    if accepted || atty::isnt(atty::Stream::Stdin) {
        return Ok(accepted);
    }
    Ok(Confirm::new()
        .with_prompt("I agree to the Terms of Service and Privacy Policy")
        .default(false)
        .interact()?)
}

pub fn run(args: SignupArgs) -> Result<()> {
    let logger = get_logger();
    let ctx = get_context()?;

    let first_name = text_or_prompt(args.first_name, "First name", "first-name")?;
    let last_name = text_or_prompt(args.last_name, "Last name", "last-name")?;
    let email = text_or_prompt(args.email, "Email", "email")?;
    let phone = text_or_prompt(args.phone, "Phone", "phone")?;
    let (password, confirm_password) = password_with_confirm(args.password)?;
    let accept_terms = ask_terms(args.accept_terms)?;

    let form = SignupForm {
        first_name,
        last_name,
        email,
        phone,
        password,
        confirm_password,
        accept_terms,
    };

    let pb = output::spinner("Creating account...");
    let result = ctx.auth_service.sign_up(&form);
    pb.finish_and_clear();

    finish(
        &logger,
        "signup",
        result,
        |_| Notice::account_created(),
        Notice::from_signup_error,
        args.json,
    )
}
