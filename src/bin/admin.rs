//! CLI administration tool for linkpulse.
//!
//! Manages owners, issues owner tokens and shows totals without going
//! through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Create an owner (prompts for the email when omitted)
//! cargo run --bin admin -- owner create --email me@example.com
//!
//! # List owners
//! cargo run --bin admin -- owner list
//!
//! # Issue a token for owner 1, valid for a week
//! cargo run --bin admin -- token issue --owner 1 --ttl-hours 168
//!
//! # View totals
//! cargo run --bin admin -- stats
//!
//! # Check database connection and migrations
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` or `DB_*` (required): PostgreSQL connection
//! - `AUTH_SECRET` (required for `token issue`): must match the server's

use linkpulse::application::services::AuthService;
use linkpulse::config::database_url_from_env;
use linkpulse::domain::OwnerId;
use linkpulse::domain::repositories::{ClickRepository, LinkRepository, OwnerRepository};
use linkpulse::infrastructure::persistence::{
    PgClickRepository, PgLinkRepository, PgOwnerRepository,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Input;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing linkpulse.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage owners
    Owner {
        #[command(subcommand)]
        action: OwnerAction,
    },

    /// Issue owner tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Show link, click and owner totals
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum OwnerAction {
    /// Create a new owner
    Create {
        /// Owner email (prompted when omitted)
        #[arg(short, long)]
        email: Option<String>,
    },

    /// List all owners
    List,
}

#[derive(Subcommand)]
enum TokenAction {
    /// Issue a signed token for an owner
    Issue {
        /// Owner id
        #[arg(short, long)]
        owner: OwnerId,

        /// Token lifetime in hours
        #[arg(long, default_value_t = 24)]
        ttl_hours: i64,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection and applied migrations
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Owner { action } => handle_owner_action(action, &connect().await?).await,
        Commands::Token { action } => handle_token_action(action),
        Commands::Stats => handle_stats(&connect().await?).await,
        Commands::Db { action } => handle_db_action(action, &connect().await?).await,
    }
}

async fn connect() -> Result<PgPool> {
    let database_url = database_url_from_env()?;

    PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")
}

async fn handle_owner_action(action: OwnerAction, pool: &PgPool) -> Result<()> {
    let repo = PgOwnerRepository::new(Arc::new(pool.clone()));

    match action {
        OwnerAction::Create { email } => create_owner(&repo, email).await,
        OwnerAction::List => list_owners(&repo).await,
    }
}

async fn create_owner(repo: &PgOwnerRepository, email: Option<String>) -> Result<()> {
    println!("{}", "Create owner".bright_blue().bold());
    println!();

    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };

    let owner = repo
        .create(email.trim())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create owner: {}", e))?;

    println!("{}", "✓ Owner created".green().bold());
    println!("  ID:    {}", owner.id.to_string().bright_yellow().bold());
    println!("  Email: {}", owner.email.cyan());
    println!();
    println!(
        "  Issue a token with: {} admin -- token issue --owner {}",
        "cargo run --bin".bright_cyan(),
        owner.id
    );

    Ok(())
}

/// Lists all owners.
///
/// ```text
///   ID    Email                          Created
///   ──────────────────────────────────────────────────────────
///   1     me@example.com                 2026-01-15 10:30
/// ```
async fn list_owners(repo: &PgOwnerRepository) -> Result<()> {
    let owners = repo
        .list()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list owners: {}", e))?;

    if owners.is_empty() {
        println!("{}", "  No owners found".yellow());
        return Ok(());
    }

    println!(
        "  {:<5} {:<30} {:<20}",
        "ID".bright_white().bold(),
        "Email".bright_white().bold(),
        "Created".bright_white().bold()
    );
    println!("  {}", "─".repeat(58).bright_black());

    for owner in &owners {
        println!(
            "  {:<5} {:<30} {}",
            owner.id.to_string().bright_black(),
            owner.email.cyan(),
            owner
                .created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black()
        );
    }

    println!();
    println!(
        "  Total: {}",
        owners.len().to_string().bright_white().bold()
    );

    Ok(())
}

fn handle_token_action(action: TokenAction) -> Result<()> {
    match action {
        TokenAction::Issue { owner, ttl_hours } => {
            if ttl_hours <= 0 {
                anyhow::bail!("--ttl-hours must be positive");
            }

            let secret = std::env::var("AUTH_SECRET").context("AUTH_SECRET must be set")?;
            if secret.is_empty() {
                anyhow::bail!("AUTH_SECRET must not be empty");
            }

            let token = AuthService::new(secret).issue(owner, chrono::Duration::hours(ttl_hours));

            println!("{}", "✓ Token issued".green().bold());
            println!("  Owner:   {}", owner.to_string().cyan());
            println!("  Expires: in {} hours", ttl_hours);
            println!("  Token:   {}", token.bright_yellow().bold());
            println!();
            println!("{}", "Use it as:".bright_white());
            println!("  Authorization: Bearer {}", token);
            println!("  ws://localhost:3000/live?token={}", token);
        }
    }

    Ok(())
}

async fn handle_stats(pool: &PgPool) -> Result<()> {
    let pool = Arc::new(pool.clone());

    let links = PgLinkRepository::new(pool.clone())
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count links: {}", e))?;
    let clicks = PgClickRepository::new(pool.clone())
        .count_all()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count clicks: {}", e))?;
    let owners = PgOwnerRepository::new(pool)
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count owners: {}", e))?;

    println!("{}", "Statistics".bright_blue().bold());
    println!();
    println!("  Owners: {}", owners.to_string().bright_green().bold());
    println!("  Links:  {}", links.to_string().bright_green().bold());
    println!("  Clicks: {}", clicks.to_string().bright_green().bold());

    Ok(())
}

async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            sqlx::query("SELECT 1").fetch_one(pool).await?;
            println!("{}", "✓ Database connection OK".green().bold());

            let applied: Result<(i64, Option<i64>), _> = sqlx::query_as(
                "SELECT COUNT(*), MAX(version) FROM _sqlx_migrations WHERE success",
            )
            .fetch_one(pool)
            .await;

            match applied {
                Ok((count, Some(latest))) => println!(
                    "  Migrations applied: {} (latest: {})",
                    count.to_string().bright_white(),
                    latest
                ),
                Ok((_, None)) | Err(_) => println!(
                    "{}",
                    "  No migrations applied yet; start the server to apply them".yellow()
                ),
            }
        }
    }

    Ok(())
}
