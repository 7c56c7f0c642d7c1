//! `summarize` command handler.

use std::path::Path;

use honeyscope_core::{AppConfig, SummaryDocument};
use honeyscope_scraper::{find_csv_artifact, read_products_csv};
use honeyscope_summarizer::{summarize_products, CompletionClient, Summarizer};

pub(crate) fn build_summarizer(config: &AppConfig) -> anyhow::Result<Summarizer> {
    let client = CompletionClient::new(
        &config.llm_api_base,
        config.require_openai_api_key()?,
        config.llm_model.clone(),
        config.request_timeout_secs,
        config.llm_max_retries,
        config.llm_backoff_base_secs,
    )?;
    Ok(Summarizer::new(client))
}

/// Reads the CSV artifact and summarizes every product in it.
///
/// # Errors
///
/// Returns an error if no artifact can be read or any summary fails.
pub(crate) async fn summarize_artifact(
    config: &AppConfig,
    summarizer: &Summarizer,
    input: Option<&Path>,
) -> anyhow::Result<Vec<SummaryDocument>> {
    let path = match input {
        Some(path) => path.to_path_buf(),
        None => find_csv_artifact(&config.data_dir)?,
    };
    let rows = read_products_csv(&path)?;
    tracing::info!(path = %path.display(), products = rows.len(), "summarizing reviews");

    Ok(summarize_products(summarizer, &rows).await?)
}

/// Runs the summarize command and stores the results in MongoDB.
///
/// Credentials are checked before any file is read or request sent. The
/// database is contacted only once every product has been summarized, so a
/// failed run stores nothing.
///
/// # Errors
///
/// Returns an error for missing credentials, any failure from
/// [`summarize_artifact`], or a failed insert.
pub(crate) async fn run_summarize(
    config: &AppConfig,
    database: &str,
    collection: &str,
    input: Option<&Path>,
) -> anyhow::Result<usize> {
    let summarizer = build_summarizer(config)?;
    let connection = config.require_mongodb_connection()?;

    let documents = summarize_artifact(config, &summarizer, input).await?;
    let inserted = honeyscope_db::persist(connection, database, collection, &documents).await?;

    tracing::info!(database, collection, inserted, "summaries persisted");
    Ok(inserted)
}
