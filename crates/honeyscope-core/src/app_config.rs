use std::path::PathBuf;

/// Runtime configuration for both pipeline stages.
///
/// Secrets are optional at load time so the scrape stage can run without
/// completion-provider or document-store credentials. The summarize stage
/// calls [`AppConfig::require_openai_api_key`] and
/// [`AppConfig::require_mongodb_connection`] before doing any work.
#[derive(Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub data_dir: PathBuf,
    pub openai_api_key: Option<String>,
    pub mongodb_connection: Option<String>,
    /// Storefront origin, e.g. `"https://www.scrollingbee.com"`.
    pub store_url: String,
    /// Collection page path relative to `store_url`.
    pub collection_path: String,
    pub reviews_widget_url: String,
    /// Shop domain sent to the reviews widget as both `url` and `shop_domain`.
    pub shop_domain: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub fetch_max_retries: u32,
    pub fetch_backoff_base_ms: u64,
    pub llm_api_base: String,
    pub llm_model: String,
    pub llm_max_retries: u32,
    pub llm_backoff_base_secs: u64,
}

impl AppConfig {
    /// Full URL of the collection page the listing scraper starts from.
    #[must_use]
    pub fn collection_url(&self) -> String {
        format!(
            "{}/{}",
            self.store_url.trim_end_matches('/'),
            self.collection_path.trim_start_matches('/')
        )
    }

    /// # Errors
    ///
    /// Returns [`crate::ConfigError::MissingEnvVar`] if `OPENAI_API_KEY` was not set.
    pub fn require_openai_api_key(&self) -> Result<&str, crate::ConfigError> {
        self.openai_api_key
            .as_deref()
            .ok_or_else(|| crate::ConfigError::MissingEnvVar("OPENAI_API_KEY".to_string()))
    }

    /// # Errors
    ///
    /// Returns [`crate::ConfigError::MissingEnvVar`] if `MONGODB_CONNECTION` was not set.
    pub fn require_mongodb_connection(&self) -> Result<&str, crate::ConfigError> {
        self.mongodb_connection
            .as_deref()
            .ok_or_else(|| crate::ConfigError::MissingEnvVar("MONGODB_CONNECTION".to_string()))
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("log_level", &self.log_level)
            .field("data_dir", &self.data_dir)
            .field(
                "openai_api_key",
                &self.openai_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "mongodb_connection",
                &self.mongodb_connection.as_ref().map(|_| "[redacted]"),
            )
            .field("store_url", &self.store_url)
            .field("collection_path", &self.collection_path)
            .field("reviews_widget_url", &self.reviews_widget_url)
            .field("shop_domain", &self.shop_domain)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("fetch_max_retries", &self.fetch_max_retries)
            .field("fetch_backoff_base_ms", &self.fetch_backoff_base_ms)
            .field("llm_api_base", &self.llm_api_base)
            .field("llm_model", &self.llm_model)
            .field("llm_max_retries", &self.llm_max_retries)
            .field("llm_backoff_base_secs", &self.llm_backoff_base_secs)
            .finish()
    }
}
