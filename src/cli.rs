//! CLI commands for bcv-api.
//!
//! Supports the API server mode and a one-shot fetch mode for running
//! the scrape from the terminal.

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::retry::{self, RetryConfig};
use crate::routes::RATE_UNAVAILABLE;
use crate::scraper;
use crate::types::ErrorResponse;

#[derive(Parser)]
#[command(name = "bcv-api")]
#[command(version, about = "BCV exchange rate scraper: API server and CLI", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the API server
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value_t = 8080)]
        port: u16,
    },

    /// Fetch the current rate once and print the result JSON
    Fetch {
        /// Extra attempts after a failed run (the pipeline itself never
        /// retries)
        #[arg(short, long, default_value_t = 0)]
        retries: u32,

        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },
}

/// Run a one-shot fetch and print the API JSON shape to stdout.
pub async fn run_fetch(retries: u32, pretty: bool) -> anyhow::Result<()> {
    let config = AppConfig::load()?;

    let retry_config = RetryConfig {
        max_retries: retries,
        ..RetryConfig::browser()
    };

    let outcome = retry::retry(&retry_config, "bcv fetch", || {
        scraper::fetch_rate(&config.scraper)
    })
    .await;

    match outcome {
        Ok(result) => {
            print_json(&result, pretty)?;
            Ok(())
        }
        Err(e) => {
            let body = ErrorResponse {
                error: RATE_UNAVAILABLE.to_string(),
                details: e.to_string(),
                success: false,
            };
            print_json(&body, pretty)?;
            anyhow::bail!("scrape failed: {}", e)
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}
