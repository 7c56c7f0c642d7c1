use honeyscope_core::SummaryDocument;
use mongodb::options::{ClientOptions, Tls};
use mongodb::{Client, Collection};

use crate::{StoreError, SummaryStore};

/// A MongoDB collection holding [`SummaryDocument`]s.
#[derive(Debug, Clone)]
pub struct MongoSummaryStore {
    client: Client,
    collection: Collection<SummaryDocument>,
}

impl MongoSummaryStore {
    /// Connects to `connection_string` with TLS disabled and binds
    /// `database.collection`.
    ///
    /// The driver connects lazily, so an unreachable server surfaces on the
    /// first insert rather than here.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Mongo`] if the connection string cannot be
    /// parsed or the client cannot be built.
    pub async fn connect(
        connection_string: &str,
        database: &str,
        collection: &str,
    ) -> Result<Self, StoreError> {
        let mut options = ClientOptions::parse(connection_string).await?;
        options.tls = Some(Tls::Disabled);
        let client = Client::with_options(options)?;
        let collection = client.database(database).collection(collection);
        Ok(Self { client, collection })
    }

    #[must_use]
    pub fn namespace(&self) -> String {
        self.collection.namespace().to_string()
    }

    /// Closes the client, waiting for in-flight operations.
    pub async fn shutdown(self) {
        self.client.shutdown().await;
    }
}

impl SummaryStore for MongoSummaryStore {
    async fn insert_summaries(&self, docs: &[SummaryDocument]) -> Result<usize, StoreError> {
        if docs.is_empty() {
            tracing::warn!(namespace = %self.namespace(), "no summaries to insert");
            return Ok(0);
        }

        let result = self.collection.insert_many(docs).await?;
        let inserted = result.inserted_ids.len();
        if inserted != docs.len() {
            return Err(StoreError::IncompleteInsert {
                inserted,
                expected: docs.len(),
            });
        }

        tracing::info!(namespace = %self.namespace(), inserted, "summaries inserted");
        Ok(inserted)
    }
}

/// Opens a connection, inserts `docs` in one batch, and closes the
/// connection whether or not the insert succeeded.
///
/// # Errors
///
/// Returns the connection error, or the insert error after the client has
/// been shut down.
pub async fn persist(
    connection_string: &str,
    database: &str,
    collection: &str,
    docs: &[SummaryDocument],
) -> Result<usize, StoreError> {
    let store = MongoSummaryStore::connect(connection_string, database, collection).await?;
    let result = store.insert_summaries(docs).await;
    store.shutdown().await;
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connect_rejects_malformed_connection_string() {
        let err = MongoSummaryStore::connect("not-a-mongo-uri", "honey", "summaries")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Mongo(_)));
    }

    #[tokio::test]
    async fn connect_binds_namespace_without_contacting_server() {
        let store = MongoSummaryStore::connect("mongodb://127.0.0.1:9", "honey", "summaries")
            .await
            .unwrap();
        assert_eq!(store.namespace(), "honey.summaries");
        store.shutdown().await;
    }

    #[tokio::test]
    async fn empty_batch_is_not_sent() {
        let store = MongoSummaryStore::connect("mongodb://127.0.0.1:9", "honey", "summaries")
            .await
            .unwrap();
        assert_eq!(store.insert_summaries(&[]).await.unwrap(), 0);
        store.shutdown().await;
    }
}
