//! Operator CLI for likr.
//!
//! Mints identity tokens and inspects or soft-deletes an owner's URLs
//! without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Issue an identity token for an owner
//! cargo run --bin likr-admin -- token issue --owner alice
//!
//! # List an owner's live URLs
//! cargo run --bin likr-admin -- urls list --owner alice --page 1 --limit 20
//!
//! # Soft-delete a URL (asks for confirmation)
//! cargo run --bin likr-admin -- urls delete --owner alice --id 42
//!
//! # Check database connection / show record counts
//! cargo run --bin likr-admin -- db check
//! cargo run --bin likr-admin -- db stats
//! ```
//!
//! # Environment Variables
//!
//! Same as the server: `IDENTITY_SIGNING_SECRET` is always required,
//! `DATABASE_URL` (or `DB_*`) for the `urls` and `db` commands.

use likr::config::{self, Config, mask_connection_string};
use likr::domain::repositories::UrlRepository;
use likr::infrastructure::persistence::PgUrlRepository;
use likr::application::services::page_offset;
use likr::prelude::AuthService;
use likr::server::connect_pool;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for operating likr.
#[derive(Parser)]
#[command(name = "likr-admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage identity tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Inspect and delete short URLs
    Urls {
        #[command(subcommand)]
        action: UrlsAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Token subcommands.
#[derive(Subcommand)]
enum TokenAction {
    /// Issue a bearer token for an owner
    Issue {
        /// Owner id the token identifies
        #[arg(short, long)]
        owner: String,
    },
}

/// URL subcommands.
#[derive(Subcommand)]
enum UrlsAction {
    /// List an owner's live URLs, newest first
    List {
        #[arg(short, long)]
        owner: String,

        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(i64).range(1..))]
        page: i64,

        #[arg(short, long, default_value_t = 10, value_parser = clap::value_parser!(i64).range(1..=100))]
        limit: i64,
    },

    /// Soft-delete one of an owner's URLs
    Delete {
        #[arg(short, long)]
        owner: String,

        /// URL id
        #[arg(long)]
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

    /// Show record and visit counts
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env()?;

    match cli.command {
        Commands::Token { action } => handle_token_action(action, &config)?,
        Commands::Urls { action } => {
            let pool = open_pool(&config).await?;
            handle_urls_action(action, &config, pool).await?;
        }
        Commands::Db { action } => {
            let pool = open_pool(&config).await?;
            handle_db_action(action, &config, &pool).await?;
        }
    }

    Ok(())
}

async fn open_pool(config: &Config) -> Result<PgPool> {
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL (or DB_HOST/DB_USER/DB_PASSWORD/DB_NAME) must be set")?;

    connect_pool(config, database_url).await
}

/// Dispatches token commands.
fn handle_token_action(action: TokenAction, config: &Config) -> Result<()> {
    match action {
        TokenAction::Issue { owner } => issue_token(config, &owner),
    }
}

/// Issues a token signed with the configured secret.
///
/// Tokens are not stored; rotating `IDENTITY_SIGNING_SECRET` invalidates all
/// of them at once.
fn issue_token(config: &Config, owner: &str) -> Result<()> {
    println!("{}", "Issue Identity Token".bright_blue().bold());
    println!();

    let auth = AuthService::new(config.identity_signing_secret.clone());
    let token = auth
        .issue(owner)
        .map_err(|e| anyhow::anyhow!("Failed to issue token: {}", e))?;

    println!("  Owner: {}", owner.trim().cyan());
    println!("  Token: {}", token.bright_yellow().bold());
    println!();
    println!("{}", "Add this to your requests:".bright_white());
    println!(
        "  {}: Bearer {}",
        "Authorization".bright_cyan(),
        token.bright_yellow()
    );
    println!();
    println!("{}", "Example:".bright_white());
    println!(
        "  curl -H \"Authorization: Bearer {}\" {}/v1/api/urls",
        token.bright_yellow(),
        config.redirect_base_url.trim_end_matches('/')
    );
    println!();

    Ok(())
}

/// Dispatches URL commands.
async fn handle_urls_action(action: UrlsAction, config: &Config, pool: PgPool) -> Result<()> {
    let repo = PgUrlRepository::new(Arc::new(pool), config.store_timeout());

    match action {
        UrlsAction::List { owner, page, limit } => {
            list_urls(&repo, config, &owner, page, limit).await
        }
        UrlsAction::Delete { owner, id, yes } => delete_url(&repo, &owner, id, yes).await,
    }
}

/// Lists an owner's live URLs.
///
/// # Output Format
///
/// ```text
///   ID    Slug         Visits  Created            Original URL
///   ─────────────────────────────────────────────────────────────
///   42    promo        17      2026-01-15 10:30   example.com/sale
/// ```
async fn list_urls(
    repo: &PgUrlRepository,
    config: &Config,
    owner: &str,
    page: i64,
    limit: i64,
) -> Result<()> {
    println!("{}", format!("URLs of {owner}").bright_blue().bold());
    println!();

    let offset = page_offset(page, limit).map_err(|e| anyhow::anyhow!("{e}"))?;

    let listing = repo
        .find_by_owner(owner, offset, limit)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list URLs: {}", e))?;

    if listing.items.is_empty() {
        println!("{}", "  No URLs found".yellow());
        println!();
        return Ok(());
    }

    println!(
        "  {:<6} {:<12} {:<7} {:<18} {}",
        "ID".bright_white().bold(),
        "Slug".bright_white().bold(),
        "Visits".bright_white().bold(),
        "Created".bright_white().bold(),
        "Original URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for record in &listing.items {
        let slug = if record.is_expired() {
            record.slug.red()
        } else {
            record.slug.cyan()
        };

        println!(
            "  {:<6} {:<12} {:<7} {:<18} {}",
            record.id.to_string().bright_black(),
            slug,
            record.visit_count,
            record
                .created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            record.original_url
        );
    }

    println!();
    println!(
        "  Page {} ({} per page), total: {}",
        page,
        limit,
        listing.total.to_string().bright_white().bold()
    );
    println!(
        "  Short URLs: {}/{}",
        config.redirect_base_url.trim_end_matches('/'),
        "<slug>".bright_black()
    );
    println!();

    Ok(())
}

/// Soft-deletes a URL after confirmation.
///
/// The slug stays reserved; there is no undelete.
async fn delete_url(repo: &PgUrlRepository, owner: &str, id: i64, skip_confirm: bool) -> Result<()> {
    println!("{}", "Delete URL".bright_blue().bold());
    println!();
    println!("  Owner: {}", owner.cyan());
    println!("  ID:    {}", id.to_string().bright_black());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this URL? Its slug can never be reused.")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "Cancelled".red());
            return Ok(());
        }
    }

    let deleted = repo
        .soft_delete(id, owner)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete URL: {}", e))?;

    if deleted {
        println!("{}", "URL deleted".green().bold());
    } else {
        println!(
            "{}",
            "No live URL with this id belongs to this owner".yellow()
        );
    }
    println!();

    Ok(())
}

/// Dispatches database commands.
async fn handle_db_action(action: DbAction, config: &Config, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => check_database(config, pool).await,
        DbAction::Stats => show_stats(pool).await,
    }
}

async fn check_database(config: &Config, pool: &PgPool) -> Result<()> {
    println!("{}", "Database Check".bright_blue().bold());
    println!();

    if let Some(ref url) = config.database_url {
        println!("  URL: {}", mask_connection_string(url).bright_black());
    }

    let version: String = sqlx::query_scalar("SELECT version()")
        .fetch_one(pool)
        .await
        .context("Database query failed")?;

    println!("  {}", "Connected".green().bold());
    println!("  {}", version.bright_black());
    println!();

    Ok(())
}

/// Displays record and visit counts.
async fn show_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "Statistics".bright_blue().bold());
    println!();

    let (live, deleted, custom): (i64, i64, i64) = sqlx::query_as(
        r#"
        SELECT
            COUNT(*) FILTER (WHERE deleted = FALSE),
            COUNT(*) FILTER (WHERE deleted = TRUE),
            COUNT(*) FILTER (WHERE is_custom_alias = TRUE)
        FROM urls
        "#,
    )
    .fetch_one(pool)
    .await
    .context("Failed to count URLs")?;

    let visits: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM visits")
        .fetch_one(pool)
        .await
        .context("Failed to count visits")?;

    let owners: i64 = sqlx::query_scalar("SELECT COUNT(DISTINCT owner_id) FROM urls")
        .fetch_one(pool)
        .await
        .context("Failed to count owners")?;

    println!("  Live URLs:      {}", live.to_string().bright_white().bold());
    println!("  Deleted URLs:   {}", deleted.to_string().bright_black());
    println!("  Custom aliases: {}", custom.to_string().cyan());
    println!("  Owners:         {}", owners.to_string().cyan());
    println!("  Visits:         {}", visits.to_string().bright_white().bold());
    println!();

    Ok(())
}
