//! Turns raw completion text into a [`SummaryDocument`].

use honeyscope_core::SummaryDocument;
use serde_json::Value;

use crate::error::SummarizerError;

/// Prose the model sometimes appends after the JSON object.
const TRAILER_MARKERS: [&str; 2] = ["Note:", "Explanation:"];

/// How much of an unexpected trailer to quote in the error.
const TRAILER_PREVIEW_CHARS: usize = 40;

/// Reads the JSON value at the start of `raw`.
///
/// Text after the value is dropped when it begins with a trailer marker.
/// Marker words inside the JSON itself are never treated as a cut point.
fn parse_leading_value(raw: &str) -> Result<Value, String> {
    let text = raw.trim_start();
    let mut stream = serde_json::Deserializer::from_str(text).into_iter::<Value>();
    let value = match stream.next() {
        Some(Ok(value)) => value,
        Some(Err(e)) => return Err(e.to_string()),
        None => return Err("completion output is empty".to_owned()),
    };

    let rest = text[stream.byte_offset()..].trim();
    if rest.is_empty() || TRAILER_MARKERS.iter().any(|marker| rest.starts_with(marker)) {
        Ok(value)
    } else {
        let preview: String = rest.chars().take(TRAILER_PREVIEW_CHARS).collect();
        Err(format!("unexpected text after JSON value: {preview:?}"))
    }
}

/// Parses the model's answer and attaches the product's metadata.
///
/// A `"Note:"` or `"Explanation:"` trailer after the JSON object is dropped.
/// The object itself is kept with its keys as the model wrote them.
///
/// # Errors
///
/// Returns [`SummarizerError::MalformedOutput`] with the untouched `raw` text
/// when the answer does not start with a JSON object, or when anything other
/// than a trailer follows it.
pub fn clean_output(
    raw: &str,
    product_name: &str,
    rating: f64,
    review_count: u32,
) -> Result<SummaryDocument, SummarizerError> {
    let malformed = |reason: String| SummarizerError::MalformedOutput {
        raw: raw.to_owned(),
        reason,
    };

    let value = parse_leading_value(raw).map_err(malformed)?;
    let Value::Object(insights) = value else {
        return Err(malformed(format!("expected an object, got {}", kind(&value))));
    };

    Ok(SummaryDocument::new(
        insights,
        product_name,
        rating,
        review_count,
    ))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
