use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keys owned by the product metadata attached after the model responds.
const METADATA_KEYS: [&str; 3] = ["product_name", "rating", "review_count"];

/// A review summary ready for the document store.
///
/// `insights` holds the JSON object returned by the completion provider with
/// its keys untouched (typically `Positive`, `Negative`, `Suggestion` and
/// `Score`). It is flattened next to the product metadata when serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryDocument {
    #[serde(flatten)]
    pub insights: Map<String, Value>,
    pub product_name: String,
    pub rating: f64,
    pub review_count: u32,
}

/// Overall product score assigned by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Score {
    /// 1 (worst) through 10 (best).
    Rated(u8),
    /// The model answered `"NA"`.
    NotAvailable,
}

impl SummaryDocument {
    /// Attaches product metadata to a model-provided insight object.
    ///
    /// If the model echoed any of the metadata keys itself, the scraped value
    /// replaces it so the serialized document never carries duplicate keys.
    #[must_use]
    pub fn new(
        mut insights: Map<String, Value>,
        product_name: impl Into<String>,
        rating: f64,
        review_count: u32,
    ) -> Self {
        for key in METADATA_KEYS {
            insights.remove(key);
        }
        Self {
            insights,
            product_name: product_name.into(),
            rating,
            review_count,
        }
    }

    /// Looks up a text section by name, ignoring ASCII case.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&str> {
        self.insight(name).and_then(Value::as_str)
    }

    #[must_use]
    pub fn positive(&self) -> Option<&str> {
        self.section("positive")
    }

    #[must_use]
    pub fn negative(&self) -> Option<&str> {
        self.section("negative")
    }

    #[must_use]
    pub fn suggestion(&self) -> Option<&str> {
        self.section("suggestion")
    }

    /// Parses the model's `Score` field.
    ///
    /// Returns `None` when the field is missing or holds something other than
    /// an integer in `1..=10` or the `"NA"` sentinel.
    #[must_use]
    pub fn score(&self) -> Option<Score> {
        match self.insight("score")? {
            Value::Number(n) => n.as_u64().and_then(rated),
            Value::String(s) => {
                let s = s.trim();
                if s.eq_ignore_ascii_case("na") || s.eq_ignore_ascii_case("n/a") {
                    Some(Score::NotAvailable)
                } else {
                    s.parse::<u64>().ok().and_then(rated)
                }
            }
            _ => None,
        }
    }

    fn insight(&self, name: &str) -> Option<&Value> {
        self.insights
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }
}

fn rated(n: u64) -> Option<Score> {
    u8::try_from(n)
        .ok()
        .filter(|v| (1..=10).contains(v))
        .map(Score::Rated)
}
