//! CLI administration tool for tinyurl.
//!
//! Provides commands for inspecting and removing short links, viewing statistics,
//! and performing database operations without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # List links, optionally by status
//! cargo run --bin admin -- links list --status inactive
//!
//! # Show one link
//! cargo run --bin admin -- links show 42
//!
//! # Delete a link (asks for confirmation unless -y)
//! cargo run --bin admin -- links delete 42
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` or `DB_HOST`/`DB_PORT`/`DB_USER`/`DB_PASSWORD`/`DB_NAME`

use tinyurl::config::Config;
use tinyurl::domain::entities::{LinkStatus, ShortLink};
use tinyurl::domain::repositories::LinkRepository;
use tinyurl::infrastructure::persistence::PgLinkRepository;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing tinyurl.
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
    /// Inspect and delete short links
    Links {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Link management subcommands.
#[derive(Subcommand)]
enum LinkAction {
    /// List links, newest first
    List {
        /// Only show links with this status (active or inactive)
        #[arg(short, long)]
        status: Option<String>,
    },

    /// Show a single link
    Show {
        /// Link ID
        id: i64,
    },

    /// Delete a link
    Delete {
        /// Link ID
        id: i64,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
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

    let database_url = Config::load_database_url()?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Links { action } => handle_link_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches link management commands.
async fn handle_link_action(action: LinkAction, pool: &PgPool) -> Result<()> {
    let repo = PgLinkRepository::new(Arc::new(pool.clone()));

    match action {
        LinkAction::List { status } => {
            let status = status
                .map(|s| s.to_ascii_lowercase().parse::<LinkStatus>())
                .transpose()?;
            list_links(&repo, status).await?;
        }
        LinkAction::Show { id } => show_link(&repo, id).await?,
        LinkAction::Delete { id, yes } => delete_link(&repo, id, yes).await?,
    }

    Ok(())
}

fn status_label(link: &ShortLink) -> ColoredString {
    if link.is_resolvable() {
        "ACTIVE".green()
    } else if link.status == LinkStatus::Inactive {
        "INACTIVE".yellow()
    } else {
        "EXPIRED".red()
    }
}

/// Lists links with status indicators.
///
/// # Output Format
///
/// ```text
/// 📋 Short Links
///
///   ID    Code                 Clicks   Created            Status
///   ──────────────────────────────────────────────────────────────────────────
///   2     abc-1                12       2026-01-16 14:20   ACTIVE
///   1     k3Jd_x9Q             0        2026-01-15 10:30   EXPIRED
/// ```
async fn list_links(repo: &PgLinkRepository, status: Option<LinkStatus>) -> Result<()> {
    println!("{}", "📋 Short Links".bright_blue().bold());
    println!();

    let links = repo
        .list_all(status)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))?;

    if links.is_empty() {
        println!("{}", "  No links found".yellow());
        return Ok(());
    }

    println!(
        "  {:<5} {:<20} {:<8} {:<18} {:<10}",
        "ID".bright_white().bold(),
        "Code".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Created".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for link in &links {
        println!(
            "  {:<5} {:<20} {:<8} {:<18} {}",
            link.id.to_string().bright_black(),
            link.short_code.cyan(),
            link.click_count,
            link.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            status_label(link)
        );
    }

    println!();
    println!("  Total: {}", links.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

async fn show_link(repo: &PgLinkRepository, id: i64) -> Result<()> {
    let link = repo
        .find_by_id(id)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .context("Link not found")?;

    println!("{}", "🔗 Short Link".bright_blue().bold());
    println!();
    println!("  ID:          {}", link.id.to_string().bright_black());
    println!("  Code:        {}", link.short_code.cyan());
    println!("  URL:         {}", link.original_url.bright_white());
    println!("  Status:      {}", status_label(&link));
    println!("  Clicks:      {}", link.click_count.to_string().bright_green());
    match link.expires_at {
        Some(expires_at) => println!("  Expires:     {}", expires_at.format("%Y-%m-%d %H:%M")),
        None => println!("  Expires:     {}", "never".bright_black()),
    }
    println!("  Created:     {}", link.created_at.format("%Y-%m-%d %H:%M"));
    println!("  Updated:     {}", link.updated_at.format("%Y-%m-%d %H:%M"));
    println!();

    Ok(())
}

/// Deletes a link with confirmation prompt.
///
/// # Safety
///
/// - Requires confirmation (default: No) unless `--yes`
/// - Deletion is permanent; the code becomes available again
async fn delete_link(repo: &PgLinkRepository, id: i64, skip_confirm: bool) -> Result<()> {
    println!("{}", "🗑  Delete Short Link".bright_blue().bold());
    println!();

    let link = repo
        .find_by_id(id)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .context("Link not found")?;

    println!("  Code: {}", link.short_code.cyan());
    println!("  URL:  {}", link.original_url.bright_white());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this link?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let deleted = repo
        .delete_by_id(id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete link: {}", e))?;

    if deleted == 0 {
        println!("{}", "⚠️  Link was already deleted".yellow());
    } else {
        println!("{}", "✅ Link deleted".green().bold());
    }
    println!();

    Ok(())
}

/// Displays system statistics.
///
/// Shows:
/// - Total number of links
/// - Number of active links
/// - Total number of clicks
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let links_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM short_links")
        .fetch_one(pool)
        .await?;

    let active_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM short_links WHERE status = 'active'")
            .fetch_one(pool)
            .await?;

    let clicks_count: i64 =
        sqlx::query_scalar("SELECT COALESCE(SUM(click_count), 0)::BIGINT FROM short_links")
            .fetch_one(pool)
            .await?;

    println!(
        "  Links:        {}",
        links_count.to_string().bright_green().bold()
    );
    println!(
        "  Active links: {}",
        active_count.to_string().bright_green().bold()
    );
    println!(
        "  Clicks:       {}",
        clicks_count.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let migrations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
                .fetch_one(pool)
                .await
                .unwrap_or(0);

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Migrations: {}", migrations.to_string().bright_white());
            println!();
        }
    }

    Ok(())
}
