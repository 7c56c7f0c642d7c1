use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let log_level = or_default("HONEYSCOPE_LOG_LEVEL", "info");
    let data_dir = PathBuf::from(or_default("HONEYSCOPE_DATA_DIR", "data"));
    let openai_api_key = optional("OPENAI_API_KEY");
    let mongodb_connection = optional("MONGODB_CONNECTION");

    let store_url = or_default("HONEYSCOPE_STORE_URL", "https://www.scrollingbee.com");
    let collection_path = or_default("HONEYSCOPE_COLLECTION_PATH", "/collections/raw-honey");
    let reviews_widget_url = or_default(
        "HONEYSCOPE_REVIEWS_WIDGET_URL",
        "https://judge.me/reviews/reviews_for_widget",
    );
    let shop_domain = or_default("HONEYSCOPE_SHOP_DOMAIN", "blebeehoney.myshopify.com");

    let request_timeout_secs = parse_u64("HONEYSCOPE_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("HONEYSCOPE_USER_AGENT", "honeyscope/0.1 (review-insights)");
    let fetch_max_retries = parse_u32("HONEYSCOPE_FETCH_MAX_RETRIES", "5")?;
    let fetch_backoff_base_ms = parse_u64("HONEYSCOPE_FETCH_BACKOFF_BASE_MS", "500")?;

    let llm_api_base = or_default("HONEYSCOPE_LLM_API_BASE", "https://api.openai.com/v1");
    let llm_model = or_default("HONEYSCOPE_LLM_MODEL", "gpt-3.5-turbo");
    let llm_max_retries = parse_u32("HONEYSCOPE_LLM_MAX_RETRIES", "5")?;
    let llm_backoff_base_secs = parse_u64("HONEYSCOPE_LLM_BACKOFF_BASE_SECS", "20")?;

    if strip_http_scheme(&store_url).is_none() {
        return Err(ConfigError::InvalidEnvVar {
            var: "HONEYSCOPE_STORE_URL".to_string(),
            reason: format!("\"{store_url}\" is not an http(s) URL"),
        });
    }

    Ok(AppConfig {
        log_level,
        data_dir,
        openai_api_key,
        mongodb_connection,
        store_url,
        collection_path,
        reviews_widget_url,
        shop_domain,
        request_timeout_secs,
        user_agent,
        fetch_max_retries,
        fetch_backoff_base_ms,
        llm_api_base,
        llm_model,
        llm_max_retries,
        llm_backoff_base_secs,
    })
}

/// Returns the part after the scheme if `url` starts with `http://` or `https://`.
fn strip_http_scheme(url: &str) -> Option<&str> {
    url.strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .filter(|rest| !rest.is_empty())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
