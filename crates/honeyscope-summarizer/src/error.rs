use thiserror::Error;

#[derive(Debug, Error)]
pub enum SummarizerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("completion provider rate limited the request")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("unexpected HTTP status {status} from completion provider: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("completion response contained no message content")]
    EmptyCompletion,

    /// The model's answer was not a JSON object after cleanup. `raw` is the
    /// untouched completion text so it can be inspected by hand.
    #[error("completion output is not a JSON object: {reason}\n--- raw output ---\n{raw}")]
    MalformedOutput { raw: String, reason: String },
}
