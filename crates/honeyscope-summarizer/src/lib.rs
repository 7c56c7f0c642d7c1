//! Review summarization for honeyscope.
//!
//! Sends each product's reviews to an OpenAI-compatible chat completion
//! endpoint with a fixed business-analyst prompt, then turns the model's
//! JSON answer into a [`honeyscope_core::SummaryDocument`].

pub mod clean;
pub mod client;
pub mod error;
pub mod pipeline;
pub mod prompt;

mod retry;

pub use clean::clean_output;
pub use client::{CompletionClient, CompletionRequest};
pub use error::SummarizerError;
pub use pipeline::{summarize_products, Summarizer};
pub use prompt::{build_messages, ChatMessage, Role};
