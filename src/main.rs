//! steam-region-hunter - Compare Steam game prices across two storefront regions.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use steam_region_hunter::commands::{CompareCommand, SearchCommand};
use steam_region_hunter::config::{Config, OutputFormat};
use steam_region_hunter::steam::Region;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "steam-region-hunter",
    version,
    about = "Compare Steam game prices across two storefront regions",
    long_about = "Finds each game in the home and foreign Steam storefronts, converts \
                  foreign prices into the home currency and reports the differences."
)]
struct Cli {
    /// Region whose currency the report uses
    #[arg(long, global = true)]
    home: Option<Region>,

    /// Region whose prices get converted
    #[arg(long, global = true)]
    foreign: Option<Region>,

    /// Foreign-to-home conversion rate
    #[arg(long, global = true)]
    rate: Option<Decimal>,

    /// Minimum title similarity (0.0-1.0)
    #[arg(long, global = true)]
    threshold: Option<f64>,

    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true, env = "SRH_PROXY")]
    proxy: Option<String>,

    /// Delay between requests in milliseconds
    #[arg(long, global = true, env = "SRH_DELAY")]
    delay: Option<u64>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Also write the comparison to an .xlsx file
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare prices of one or more games
    #[command(alias = "c")]
    Compare {
        /// Game names (comma-separated); prompts when omitted
        #[arg(value_delimiter = ',')]
        games: Vec<String>,
    },

    /// Show the parsed search results of one storefront
    #[command(alias = "s")]
    Search {
        /// Search term
        term: String,

        /// Storefront to search (defaults to the home region)
        #[arg(short, long)]
        region: Option<Region>,
    },

    /// List supported regions
    Regions,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    if let Some(home) = cli.home {
        config.home_region = home;
    }
    if let Some(foreign) = cli.foreign {
        config.foreign_region = foreign;
    }
    if let Some(rate) = cli.rate {
        config.conversion_rate = rate;
    }
    if let Some(threshold) = cli.threshold {
        config.similarity_threshold = threshold;
    }
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }
    if let Some(delay) = cli.delay {
        config.delay_ms = delay;
    }
    if let Some(format) = cli.format {
        config.format = format;
    }
    if let Some(output) = cli.output {
        config.output = Some(output);
    }

    config.validate()?;

    match cli.command {
        Commands::Compare { games } => {
            let games = if games.is_empty() { prompt_games()? } else { games };
            if games.iter().all(|g| g.trim().is_empty()) {
                anyhow::bail!("No game names given.");
            }

            let cmd = CompareCommand::new(config);
            let output = cmd.execute(&games).await?;
            println!("{}", output);
        }

        Commands::Search { term, region } => {
            let region = region.unwrap_or(config.home_region);
            let cmd = SearchCommand::new(config);
            let output = cmd.execute(&term, region).await?;
            println!("{}", output);
        }

        Commands::Regions => {
            println!("Supported Steam regions:\n");
            println!("{:<6} {:<10} {:<10} {:<6}", "Code", "Name", "Currency", "Symbol");
            println!("{:-<6} {:-<10} {:-<10} {:-<6}", "", "", "", "");

            for region in Region::all() {
                println!(
                    "{:<6} {:<10} {:<10} {:<6}",
                    region.to_string(),
                    region.name(),
                    region.currency(),
                    region.symbol()
                );
            }
        }
    }

    Ok(())
}

/// Reads a comma-separated list of game names from stdin.
fn prompt_games() -> Result<Vec<String>> {
    print!("Enter game names (comma-separated): ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line).context("Failed to read game names")?;

    Ok(line.split(',').map(|g| g.trim().to_string()).filter(|g| !g.is_empty()).collect())
}
