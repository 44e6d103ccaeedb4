//! Forgot-password command - check that an account exists for a reset

use anyhow::Result;

use smarthome_core::{Notice, PasswordReset};

use super::{finish, get_context, get_logger};

fn reset_notice(outcome: &PasswordReset) -> Notice {
    match outcome {
        PasswordReset::InstructionsSent => Notice::reset_instructions_sent(),
        PasswordReset::UnknownAccount => Notice::unknown_account(),
    }
}

pub fn run(email: &str, json: bool) -> Result<()> {
    let logger = get_logger();
    let ctx = get_context()?;

    let result = ctx.auth_service.request_password_reset(email);
    let unknown = matches!(result, Ok(PasswordReset::UnknownAccount));
    finish(
        &logger,
        "forgot_password",
        result,
        reset_notice,
        Notice::from_error,
        json,
    )?;

    if unknown {
        std::process::exit(1);
    }
    Ok(())
}
