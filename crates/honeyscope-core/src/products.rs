use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One customer review as rendered by the reviews widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// `"title | body"`, or just the body when the review has no title.
    pub text: String,
    /// Publication date. `None` when the widget's timestamp was missing or
    /// unparseable; the review text is kept either way.
    pub date: Option<NaiveDate>,
}

impl Review {
    /// Joins an optional title and a body into the stored review text.
    ///
    /// An empty title yields the body unchanged, with no leading separator.
    #[must_use]
    pub fn compose_text(title: &str, body: &str) -> String {
        if title.is_empty() {
            body.to_string()
        } else {
            format!("{title} | {body}")
        }
    }
}

/// A product card from the collection page, with every review attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRow {
    pub name: String,
    pub image_url: String,
    pub product_url: String,
    /// Price with the currency prefix and thousands separators removed.
    pub price: Decimal,
    /// Star rating from the listing badge, in half-star steps from 0 to 5.
    pub rating: f64,
    pub review_count: u32,
    pub reviews: Vec<Review>,
}

impl ProductRow {
    /// Review texts in widget order.
    #[must_use]
    pub fn review_texts(&self) -> Vec<&str> {
        self.reviews.iter().map(|r| r.text.as_str()).collect()
    }

    /// Review dates in widget order, one slot per review.
    #[must_use]
    pub fn review_dates(&self) -> Vec<Option<NaiveDate>> {
        self.reviews.iter().map(|r| r.date).collect()
    }

    /// Number of reviews whose date could not be resolved.
    #[must_use]
    pub fn undated_review_count(&self) -> usize {
        self.reviews.iter().filter(|r| r.date.is_none()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(reviews: Vec<Review>) -> ProductRow {
        ProductRow {
            name: "Wild Forest Honey".to_string(),
            image_url: "https://cdn.example.com/wild.jpg".to_string(),
            product_url: "https://shop.example.com/products/wild".to_string(),
            price: Decimal::new(49900, 2),
            rating: 4.5,
            review_count: 2,
            reviews,
        }
    }

    #[test]
    fn compose_text_without_title_is_body_only() {
        assert_eq!(Review::compose_text("", "Lovely taste"), "Lovely taste");
    }

    #[test]
    fn compose_text_with_title_uses_pipe_separator() {
        assert_eq!(
            Review::compose_text("Superb", "Lovely taste"),
            "Superb | Lovely taste"
        );
    }

    #[test]
    fn review_dates_keep_one_slot_per_review() {
        let dated = NaiveDate::from_ymd_opt(2023, 4, 12).unwrap();
        let product = row(vec![
            Review {
                text: "a".to_string(),
                date: Some(dated),
            },
            Review {
                text: "b".to_string(),
                date: None,
            },
        ]);
        assert_eq!(product.review_texts(), vec!["a", "b"]);
        assert_eq!(product.review_dates(), vec![Some(dated), None]);
        assert_eq!(product.undated_review_count(), 1);
    }
}
