//! Moat CLI binary.
//!
//! Fetches one ticker's financial statements and prints the historical and
//! summary tables.

mod integration;

use chrono::Duration;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use integration::cache_manager;
use moat::data::{FetchConfig, Frequency, YahooClient, YahooFundamentalsProvider};
use std::process;
use std::time::Duration as StdDuration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "moat")]
#[command(about = "Moat: ROIC, growth and fair-value analysis of a single stock", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive growth, ROIC and a price projection for a stock
    Analyze {
        /// Stock symbol
        symbol: String,

        /// Use quarterly instead of annual statements
        #[arg(long)]
        quarterly: bool,

        /// Disable caching (always fetch fresh data)
        #[arg(long)]
        no_cache: bool,

        /// Force refresh cached data
        #[arg(long)]
        refresh: bool,

        /// Treat cached responses older than this many days as missing
        #[arg(long)]
        max_age_days: Option<i64>,
    },

    /// Inspect or clear the response cache
    Cache {
        /// Show cache statistics
        #[arg(long)]
        stats: bool,

        /// Clear cached responses
        #[arg(long)]
        clear: bool,

        /// Restrict --clear to one symbol
        #[arg(long)]
        symbol: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            symbol,
            quarterly,
            no_cache,
            refresh,
            max_age_days,
        } => {
            let frequency = if quarterly {
                Frequency::Quarterly
            } else {
                Frequency::Annual
            };
            let config = FetchConfig {
                use_cache: !no_cache,
                force_refresh: refresh,
                max_age: max_age_days.map(Duration::days),
            };
            analyze_symbol(&symbol, frequency, config).await?;
        }
        Commands::Cache {
            stats,
            clear,
            symbol,
        } => {
            manage_cache(stats, clear, symbol.as_deref())?;
        }
    }

    Ok(())
}

async fn analyze_symbol(
    symbol: &str,
    frequency: Frequency,
    config: FetchConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let symbol = symbol.trim().to_uppercase();

    println!("\nFUNDAMENTAL ANALYSIS: {}", symbol);
    println!("Statements: {}", frequency.yahoo_prefix());

    let mut client = YahooClient::new()?;
    if config.use_cache {
        cache_manager::print_cache_info();
        if config.force_refresh {
            println!("  Mode: Force refresh (re-fetching all data)");
        }
        client = client.with_cache(cache_manager::open_cache()?);
    } else {
        println!("  Cache: Disabled");
    }
    println!();

    let provider = YahooFundamentalsProvider::new(client.with_fetch_config(config), frequency);

    // Rate limiting makes the fetch the slow step
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(StdDuration::from_millis(100));
    pb.set_message(format!("Fetching statements for {}...", symbol));

    let analysis = match moat::analyze(&provider, &symbol).await {
        Ok(analysis) => {
            pb.finish_with_message(format!(
                "Fetched {} periods",
                analysis.historical.len()
            ));
            analysis
        }
        Err(e) => {
            pb.finish_with_message("Failed!");
            return Err(e.into());
        }
    };

    println!("\n{}", analysis.historical.to_dataframe()?);
    println!("\n{}", analysis.summary.to_dataframe()?);

    Ok(())
}

fn manage_cache(
    show_stats: bool,
    clear: bool,
    symbol: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let cache = cache_manager::open_cache()?;

    if clear {
        match symbol {
            Some(symbol) => {
                let symbol = symbol.trim().to_uppercase();
                let removed = cache.clear_symbol(&symbol)?;
                println!("Removed {} cached responses for {}", removed, symbol);
            }
            None => {
                cache.clear_all()?;
                println!("Cache cleared");
            }
        }
    }

    if show_stats || !clear {
        let stats = cache.get_stats()?;
        println!("Cache location: {}", cache_manager::get_cache_path().display());
        println!("  Responses: {}", stats.responses);
        println!("  Symbols:   {}", stats.unique_symbols);
        if let (Some(oldest), Some(newest)) = (&stats.oldest_entry, &stats.newest_entry) {
            println!("  Oldest:    {}", oldest);
            println!("  Newest:    {}", newest);
        }
    }

    Ok(())
}
