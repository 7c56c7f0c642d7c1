//! Product-by-product summarization.

use honeyscope_core::{ProductRow, SummaryDocument};

use crate::clean::clean_output;
use crate::client::CompletionClient;
use crate::error::SummarizerError;
use crate::prompt::build_messages;

pub const TEMPERATURE: f64 = 0.7;
pub const MAX_TOKENS: u32 = 1000;

/// Asks the completion provider for one summary per review list.
#[derive(Debug, Clone)]
pub struct Summarizer {
    client: CompletionClient,
}

impl Summarizer {
    #[must_use]
    pub fn new(client: CompletionClient) -> Self {
        Self { client }
    }

    /// Returns the model's raw answer for one product's reviews.
    ///
    /// # Errors
    ///
    /// Propagates [`CompletionClient::complete`] errors.
    pub async fn summarize<S: AsRef<str>>(&self, reviews: &[S]) -> Result<String, SummarizerError> {
        let messages = build_messages(reviews);
        self.client.complete(&messages, TEMPERATURE, MAX_TOKENS).await
    }

    /// Summarizes one product and attaches its metadata.
    ///
    /// # Errors
    ///
    /// Propagates completion errors and [`SummarizerError::MalformedOutput`].
    pub async fn summarize_product(
        &self,
        row: &ProductRow,
    ) -> Result<SummaryDocument, SummarizerError> {
        let raw = self.summarize(&row.review_texts()).await?;
        clean_output(&raw, &row.name, row.rating, row.review_count)
    }
}

/// Summarizes every row in order, one completion request at a time.
///
/// The first failure aborts the batch; nothing summarized so far is returned.
///
/// # Errors
///
/// Returns the first error from [`Summarizer::summarize_product`].
pub async fn summarize_products(
    summarizer: &Summarizer,
    rows: &[ProductRow],
) -> Result<Vec<SummaryDocument>, SummarizerError> {
    let mut documents = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        tracing::info!(
            batch = index + 1,
            total = rows.len(),
            product = %row.name,
            reviews = row.reviews.len(),
            "========== Batch {} ==========",
            index + 1
        );
        if row.reviews.is_empty() {
            tracing::warn!(product = %row.name, "product has no reviews; summarizing empty list");
        }

        let document = summarizer.summarize_product(row).await.inspect_err(|e| {
            tracing::error!(product = %row.name, error = %e, "summarization failed");
        })?;
        documents.push(document);
    }
    Ok(documents)
}
