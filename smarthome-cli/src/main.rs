//! SmartHome CLI - account signup and login in your terminal

use std::io;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod output;

use commands::{forgot_password, login, logout, logs, signup, status, users};

/// SmartHome - account management in your terminal
#[derive(Parser)]
#[command(name = "smarthome", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and log in
    Signup(signup::SignupArgs),

    /// Log in to an existing account
    Login {
        /// Email address
        #[arg(long)]
        email: Option<String>,
        /// Password (or set SMARTHOME_PASSWORD)
        #[arg(long)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Log out of the current session
    Logout {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show who is logged in
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List registered accounts
    Users {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Request password reset instructions
    ForgotPassword {
        /// Email address of the account
        email: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// View and manage the event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

/// Initialize the tracing subscriber for diagnostics
fn init_tracing() {
    // RUST_LOG controls the level (e.g. RUST_LOG=smarthome_core=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = run(cli);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Signup(args) => signup::run(args),
        Commands::Login { email, password, json } => login::run(email, password, json),
        Commands::Logout { json } => logout::run(json),
        Commands::Status { json } => status::run(json),
        Commands::Users { json } => users::run(json),
        Commands::ForgotPassword { email, json } => forgot_password::run(&email, json),
        Commands::Logs { command } => logs::run(command),
    }
}
