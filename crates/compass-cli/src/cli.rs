//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Compass - personal life-management backend
#[derive(Parser)]
#[command(name = "compass")]
#[command(about = "Self-hosted finances, health, tasks, and life balance", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "compass.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set COMPASS_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and seed the default wheel of life
    Init,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Disable authentication (local development only)
        #[arg(long)]
        no_auth: bool,

        /// Directory of static files to serve at /
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Show database and completion-service status
    Status,

    /// Analyze stored spending
    Spending {
        /// Window: week, month, or year
        #[arg(long, default_value = "month")]
        period: String,
    },

    /// Recommend a budget from the last 30 days of spending
    Budget {
        /// Monthly income
        #[arg(long)]
        income: f64,

        /// Savings goal as a percentage of income
        #[arg(long)]
        target: Option<f64>,
    },

    /// Project cash flow from a JSON plan of income sources and recurring expenses
    Cashflow {
        /// Plan file: {"income_sources": [...], "recurring_expenses": [...]}
        #[arg(short, long)]
        file: PathBuf,

        /// Months to project
        #[arg(short, long)]
        months: Option<u32>,
    },

    /// Show the wheel of life
    Wheel,

    /// Assess burnout risk from life-area ratings and recent goals
    Burnout,

    /// Print a spaced-repetition review schedule
    ReviewSchedule {
        /// Number of concepts to review
        #[arg(short, long)]
        concepts: u32,
    },

    /// Show today's tasks and reminders
    Today,
}
