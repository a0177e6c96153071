//! Agenda CLI - Search the Madrid event catalog from the terminal
//!
//! Thin client over the Agenda API server.

mod api;
mod config;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use colored::Colorize;

use api::{AgendaClient, SearchRequest};
use config::Config;

#[derive(Parser)]
#[command(name = "agenda")]
#[command(about = "Agenda CLI - semantic search over the Madrid event catalog", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store server URL and API key
    Login {
        /// API key protecting the server (omit when the server runs open)
        #[arg(short, long)]
        key: Option<String>,
        /// Server base URL
        #[arg(short, long)]
        url: Option<String>,
    },

    /// Search events by meaning
    Search {
        /// Free-text query (e.g. "flamenco al aire libre")
        query: String,
        /// Max results
        #[arg(short, long, default_value = "10")]
        limit: usize,
        /// Filter by district (repeatable)
        #[arg(short, long = "district")]
        districts: Vec<String>,
        /// Filter by event type (repeatable)
        #[arg(short = 't', long = "type")]
        event_types: Vec<String>,
        /// Max price in euros (0 keeps only free events)
        #[arg(long)]
        max_price: Option<f64>,
        /// Only events active on or after this date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// Only events active on or before this date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Venue name contains (case-insensitive)
        #[arg(long)]
        venue: Option<String>,
    },

    /// Pull the municipal feed into the collection
    Ingest,

    /// Show collection statistics
    Stats,

    /// Drop and recreate the collection
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Login { key, url } => cmd_login(key, url).await,
        Commands::Search {
            query,
            limit,
            districts,
            event_types,
            max_price,
            from,
            to,
            venue,
        } => {
            cmd_search(
                query,
                limit,
                districts,
                event_types,
                max_price,
                from,
                to,
                venue,
            )
            .await
        }
        Commands::Ingest => cmd_ingest().await,
        Commands::Stats => cmd_stats().await,
        Commands::Reset { yes } => cmd_reset(yes).await,
        Commands::Config => cmd_config(),
    }
}

// ============================================
// Command Implementations
// ============================================

fn client(config: &Config) -> AgendaClient {
    AgendaClient::new(&config.base_url, config.api_key.as_deref())
}

async fn cmd_login(key: Option<String>, url: Option<String>) -> Result<()> {
    let mut config = Config::load()?;

    if let Some(url) = url {
        config.set_base_url(url);
    }
    if let Some(key) = key {
        config.set_api_key(key);
    }

    print!("Testing connection to {}... ", config.base_url);
    match client(&config).health().await {
        Ok(true) => {
            println!("{}", "OK".green());
        }
        _ => {
            println!("{}", "Failed".red());
            bail!("Could not connect to the Agenda API. Check the server URL.");
        }
    }

    config.save()?;
    println!(
        "{} Configuration saved to {:?}",
        "✓".green(),
        Config::config_path()?
    );

    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn cmd_search(
    query: String,
    limit: usize,
    districts: Vec<String>,
    event_types: Vec<String>,
    max_price: Option<f64>,
    from: Option<String>,
    to: Option<String>,
    venue: Option<String>,
) -> Result<()> {
    let config = Config::load()?;

    let request = SearchRequest {
        query: query.clone(),
        limit: Some(limit),
        districts,
        event_types,
        price_max: max_price,
        date_from: from.as_deref().map(parse_day_start).transpose()?,
        date_to: to.as_deref().map(parse_day_end).transpose()?,
        venue,
    };

    let response = client(&config).search(&request).await?;

    if response.results.is_empty() {
        println!("No events found for '{}'", query);
        return Ok(());
    }

    println!(
        "{} results for '{}':",
        response.results.len().to_string().green(),
        query
    );

    for result in response.results {
        let event = result.event;
        let affinity = format!("{:>4.0}%", result.similarity * 100.0);

        println!(
            "\n{:>2}. {} {}",
            result.rank,
            event.title.cyan().bold(),
            format!("[{}]", affinity).dimmed()
        );
        println!(
            "    {} | {} | {}",
            event.district,
            event.venue.dimmed(),
            format_price(event.price)
        );
        println!("    {}", format_dates(event.start_date, event.end_date));
        if !event.description.is_empty() {
            println!("    {}", truncate_string(&event.description, 100).dimmed());
        }
    }

    Ok(())
}

async fn cmd_ingest() -> Result<()> {
    let config = Config::load()?;

    println!("Pulling the municipal feed, this can take a while...");
    let report = client(&config).ingest().await?;

    println!("{} Ingestion complete", "✓".green());
    println!("  Records seen:   {}", report.total);
    println!("  Ingested:       {}", report.ingested.to_string().green());
    println!("  Unchanged:      {}", report.unchanged);
    println!("  Skipped:        {}", format_count_warn(report.skipped));
    println!("  Deleted:        {}", report.deleted);

    Ok(())
}

async fn cmd_stats() -> Result<()> {
    let config = Config::load()?;
    let stats = client(&config).stats().await?;

    println!("{}", "Collection:".bold());
    println!("  Name:   {}", stats.collection_name.cyan());
    println!("  Events: {}", stats.total_events.to_string().green());
    println!("  Model:  {}", stats.embedding_model.dimmed());

    Ok(())
}

async fn cmd_reset(yes: bool) -> Result<()> {
    if !yes {
        bail!("Reset deletes every stored event. Re-run with --yes to confirm.");
    }

    let config = Config::load()?;
    client(&config).reset().await?;

    println!("{} Collection reset", "✓".green());

    Ok(())
}

fn cmd_config() -> Result<()> {
    let config = Config::load()?;

    println!("{}", "Configuration:".bold());
    println!("  Path: {:?}", Config::config_path()?);
    println!("  Base URL: {}", config.base_url);
    println!(
        "  API Key: {}",
        if config.api_key.is_some() {
            "Set".green()
        } else {
            "Not set".red()
        }
    );

    Ok(())
}

// ============================================
// Formatting helpers
// ============================================

fn parse_day_start(raw: &str) -> Result<DateTime<Utc>> {
    let date = parse_day(raw)?;
    Ok(date
        .and_hms_opt(0, 0, 0)
        .context("invalid time of day")?
        .and_utc())
}

fn parse_day_end(raw: &str) -> Result<DateTime<Utc>> {
    let date = parse_day(raw)?;
    Ok(date
        .and_hms_opt(23, 59, 59)
        .context("invalid time of day")?
        .and_utc())
}

fn parse_day(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("'{}' is not a YYYY-MM-DD date", raw))
}

fn format_price(price: Option<f64>) -> String {
    match price {
        Some(p) if p == 0.0 => "free".green().to_string(),
        Some(p) => format!("{:.2} €", p),
        None => "price unknown".dimmed().to_string(),
    }
}

fn format_dates(start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> String {
    match end {
        Some(end) if end.date_naive() != start.date_naive() => {
            format!("{} → {}", start.format("%Y-%m-%d"), end.format("%Y-%m-%d"))
        }
        _ => start.format("%Y-%m-%d %H:%M").to_string(),
    }
}

fn format_count_warn(count: usize) -> String {
    if count > 0 {
        count.to_string().yellow().to_string()
    } else {
        count.to_string()
    }
}

/// Truncate string safely for UTF-8 (by char count, not bytes)
fn truncate_string(s: &str, max_chars: usize) -> String {
    let chars: Vec<char> = s.chars().take(max_chars).collect();
    if s.chars().count() > max_chars {
        format!("{}...", chars.into_iter().collect::<String>())
    } else {
        s.to_string()
    }
}
