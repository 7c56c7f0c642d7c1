use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod scrape;
mod summarize;

#[derive(Debug, Parser)]
#[command(name = "honeyscope-cli")]
#[command(about = "Scrape storefront reviews and summarize them with a language model")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape the collection page and every product's reviews into a CSV file
    Scrape {
        /// Output file name inside the data directory (".csv" is appended)
        #[arg(long, default_value = "data")]
        filename: String,
        /// Write the rows collected so far when a product fails mid-run
        #[arg(long)]
        allow_partial: bool,
    },
    /// Summarize each product's reviews and store the results in MongoDB
    Summarize {
        #[arg(long)]
        database_name: String,
        #[arg(long)]
        collection_name: String,
        /// CSV artifact to read; defaults to the first CSV in the data directory
        #[arg(long)]
        input: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let config = honeyscope_core::load_app_config_from_env()?;

    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.log_level))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let started = Instant::now();

    match cli.command {
        Commands::Scrape {
            filename,
            allow_partial,
        } => {
            scrape::run_scrape(&config, &filename, allow_partial).await?;
        }
        Commands::Summarize {
            database_name,
            collection_name,
            input,
        } => {
            summarize::run_summarize(&config, &database_name, &collection_name, input.as_deref())
                .await?;
        }
    }

    tracing::info!(
        elapsed_secs = started.elapsed().as_secs_f64(),
        "total time taken"
    );
    Ok(())
}

#[cfg(test)]
mod tests;
