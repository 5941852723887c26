//! CLI administration tool for shortlink.
//!
//! # Usage
//!
//! ```bash
//! # Record counts and the next id the server would issue
//! cargo run --bin admin -- stats
//!
//! # Look up a short code
//! cargo run --bin admin -- resolve 1c
//!
//! # Codec helpers (no database needed)
//! cargo run --bin admin -- encode 100
//! cargo run --bin admin -- decode 1c
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! The tool only reads records. Ids are issued exclusively by the running
//! server's allocator.
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required for database commands): PostgreSQL connection string

use shortlink::domain::repositories::RecordRepository;
use shortlink::infrastructure::persistence::PgRecordRepository;
use shortlink::utils::base62;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing shortlink.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// Show record statistics
    Stats,

    /// Resolve a short code to its URL
    Resolve {
        /// Base-62 short code
        code: String,
    },

    /// Encode a record id as a short code
    Encode {
        /// Record id
        id: u64,
    },

    /// Decode a short code into a record id
    Decode {
        /// Base-62 short code
        code: String,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Encode { id } => {
            println!("{}", base62::encode(id).bright_green().bold());
        }
        Commands::Decode { code } => {
            let id = base62::decode(&code)?;
            println!("{}", id.to_string().bright_green().bold());
        }
        Commands::Stats => handle_stats(&connect().await?).await?,
        Commands::Resolve { code } => handle_resolve(&connect().await?, &code).await?,
        Commands::Db { action } => handle_db_action(action, &connect().await?).await?,
    }

    Ok(())
}

async fn connect() -> Result<PgPool> {
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")
}

/// Displays record statistics.
///
/// Shows:
/// - Total number of records
/// - Highest stored id and its short code
/// - The id a freshly started server would issue next
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "Statistics".bright_blue().bold());
    println!();

    let repo = PgRecordRepository::new(Arc::new(pool.clone()));

    let count = repo.count().await?;
    let max_id = repo.max_id().await?;
    let next_id = max_id.map_or(0, |max| max.saturating_add(1));

    println!("  Records: {}", count.to_string().bright_green().bold());

    match max_id {
        Some(max) => println!(
            "  Max id:  {} ({})",
            max.to_string().bright_green().bold(),
            base62::encode(max).cyan()
        ),
        None => println!("  Max id:  {}", "none".yellow()),
    }

    println!(
        "  Next id: {} ({})",
        next_id.to_string().bright_green().bold(),
        base62::encode(next_id).cyan()
    );
    println!();

    Ok(())
}

/// Looks up a short code.
async fn handle_resolve(pool: &PgPool, code: &str) -> Result<()> {
    let id = match base62::decode(code) {
        Ok(id) => id,
        Err(e) => {
            println!("{} {}", "Invalid code:".red(), e);
            return Ok(());
        }
    };

    let repo = PgRecordRepository::new(Arc::new(pool.clone()));

    match repo.find_by_id(id).await? {
        Some(record) => {
            println!("  Code: {}", code.cyan());
            println!("  Id:   {}", record.id.to_string().bright_black());
            println!("  URL:  {}", record.url.bright_white());
        }
        None => println!("{}", format!("Short URL '{}' not found", code).yellow()),
    }

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}
