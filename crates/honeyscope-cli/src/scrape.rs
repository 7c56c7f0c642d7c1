//! `scrape` command handler.

use std::path::PathBuf;

use honeyscope_core::AppConfig;
use honeyscope_scraper::{
    write_products_csv, ListingScraper, PageFetcher, ReviewExtractor, ScrapeOutcome,
};

pub(crate) fn build_scraper(config: &AppConfig) -> anyhow::Result<ListingScraper> {
    let fetcher = PageFetcher::new(
        config.request_timeout_secs,
        &config.user_agent,
        config.fetch_max_retries,
        config.fetch_backoff_base_ms,
    )
    .map_err(|e| anyhow::anyhow!("failed to build page fetcher: {e}"))?;
    let reviews = ReviewExtractor::new(
        fetcher.clone(),
        config.reviews_widget_url.clone(),
        config.shop_domain.clone(),
    );
    Ok(ListingScraper::new(fetcher, reviews, config.store_url.clone()))
}

/// Scrapes the configured collection and writes `<data_dir>/<filename>.csv`.
///
/// A partial scrape is written only when `allow_partial` is set; otherwise
/// the command fails and nothing is written.
///
/// # Errors
///
/// Returns an error if the collection page cannot be fetched, a product fails
/// without `allow_partial`, or the CSV cannot be written.
pub(crate) async fn run_scrape(
    config: &AppConfig,
    filename: &str,
    allow_partial: bool,
) -> anyhow::Result<PathBuf> {
    let collection_url = config.collection_url();
    tracing::info!(url = %collection_url, "scraping collection");

    let outcome = build_scraper(config)?.scrape(&collection_url).await?;

    let rows = match outcome {
        ScrapeOutcome::Complete { rows } => rows,
        ScrapeOutcome::Partial {
            rows,
            total,
            failed_index,
            error,
        } => {
            if !allow_partial {
                anyhow::bail!(
                    "scrape stopped at product {failed_index} of {total}: {error}; \
                     rerun with --allow-partial to keep the {} rows collected",
                    rows.len()
                );
            }
            tracing::warn!(
                collected = rows.len(),
                total,
                failed_index,
                error = %error,
                "writing partial scrape"
            );
            rows
        }
    };

    let path = write_products_csv(&config.data_dir, filename, &rows)?;
    Ok(path)
}
