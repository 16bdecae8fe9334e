//! Agenda CLI - schedule, request and approve institutional events
//!
//! Talks to the scheduling backend through `agenda-core`; sessions live in
//! the OS keychain, one per profile.

mod auth;
mod cli;
mod commands;
mod config_profiles;
mod error;
mod navigator;

use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::commands::auth_cmd::run_auth;
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::events::run_events;
use crate::commands::pending::run_pending;
use crate::commands::users::{run_pending_users, run_users};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        tracing::debug!("{error}");
        if !error.already_alerted() {
            eprintln!("Error: {}", error.user_message());
        }
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "agenda=info".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let profile = cli.profile.as_deref();

    match cli.command {
        Commands::Auth { command } => run_auth(command, profile).await,
        Commands::Config { command } => run_config(command, profile),
        Commands::Events { command } => run_events(command, profile).await,
        Commands::Pending { command } => run_pending(command, profile).await,
        Commands::Users { command } => run_users(command, profile).await,
        Commands::PendingUsers { command } => run_pending_users(command, profile).await,
        Commands::Completions { shell, output } => run_completions(shell, output.as_deref()),
    }
}
