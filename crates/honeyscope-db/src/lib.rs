//! Document-store sink for review summaries.

mod mongo;

use std::future::Future;

use honeyscope_core::SummaryDocument;
use thiserror::Error;

pub use mongo::{persist, MongoSummaryStore};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),

    #[error("store acknowledged {inserted} of {expected} documents")]
    IncompleteInsert { inserted: usize, expected: usize },
}

/// A destination for finished summaries.
///
/// Inserts are append-only: writing the same documents twice stores them
/// twice.
pub trait SummaryStore {
    /// Inserts every document in one batch and returns how many were stored.
    ///
    /// An empty slice is a no-op returning `0`.
    fn insert_summaries(
        &self,
        docs: &[SummaryDocument],
    ) -> impl Future<Output = Result<usize, StoreError>> + Send;
}
