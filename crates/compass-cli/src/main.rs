//! Compass CLI - personal life-management backend
//!
//! Usage:
//!   compass init                   Initialize database
//!   compass serve --port 3000      Start web server
//!   compass spending --period week Analyze stored spending
//!   compass today                  Today's tasks and reminders

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Serve {
            port,
            host,
            no_auth,
            static_dir,
        } => {
            commands::cmd_serve(
                &cli.db,
                &host,
                port,
                no_auth,
                cli.no_encrypt,
                static_dir.as_deref(),
            )
            .await
        }
        Commands::Status => commands::cmd_status(&cli.db, cli.no_encrypt).await,
        Commands::Spending { period } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_spending(&db, &period)
        }
        Commands::Budget { income, target } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_budget(&db, income, target)
        }
        Commands::Cashflow { file, months } => commands::cmd_cashflow(&file, months),
        Commands::Wheel => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_wheel(&db)
        }
        Commands::Burnout => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_burnout(&db)
        }
        Commands::ReviewSchedule { concepts } => commands::cmd_review_schedule(concepts),
        Commands::Today => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_today(&db)
        }
    }
}
