//! Text cleanup for values read off the collection page.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::ScraperError;

/// Currency prefix the storefront puts in front of every price.
const CURRENCY_PREFIX: &str = "Rs. ";

/// Sums the star rating encoded in the badge's marker classes.
///
/// A marker whose class contains `--on` is a full star (1.0); one containing
/// `--half` is a half star (0.5). A marker is counted at most once, and
/// `--off` markers contribute nothing.
#[must_use]
pub fn calculate_stars<'a, I>(marker_classes: I) -> f64
where
    I: IntoIterator<Item = &'a str>,
{
    marker_classes
        .into_iter()
        .map(|class| {
            if class.contains("--on") {
                1.0
            } else if class.contains("--half") {
                0.5
            } else {
                0.0
            }
        })
        .sum()
}

/// Strips the currency prefix and thousands separators and parses the price.
///
/// `"Rs. 1,250.00"` becomes `1250.00`.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidValue`] if what remains is not a decimal number.
pub fn clean_price(raw: &str) -> Result<Decimal, ScraperError> {
    let cleaned = raw.trim().replace(CURRENCY_PREFIX, "").replace(',', "");
    let cleaned = cleaned.trim();
    Decimal::from_str(cleaned).map_err(|e| ScraperError::InvalidValue {
        field: "price",
        value: raw.to_owned(),
        reason: e.to_string(),
    })
}

/// Strips the `review`/`reviews` label from the badge text and parses the count.
///
/// `"24 reviews"` becomes `24`; `"1 review"` becomes `1`. A badge carrying
/// only the label, such as `"No reviews"`, means `0`.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidValue`] if what remains is not a whole number.
pub fn clean_review_count(raw: &str) -> Result<u32, ScraperError> {
    let cleaned = raw
        .trim()
        .to_ascii_lowercase()
        .replace("reviews", "")
        .replace("review", "")
        .replace(',', "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() || cleaned == "no" {
        return Ok(0);
    }
    cleaned
        .parse::<u32>()
        .map_err(|e| ScraperError::InvalidValue {
            field: "review count",
            value: raw.to_owned(),
            reason: e.to_string(),
        })
}

/// Turns a protocol-relative CDN image source into an `https:` URL.
#[must_use]
pub fn absolute_image_url(src: &str) -> String {
    let src = src.trim();
    if src.starts_with("//") {
        format!("https:{src}")
    } else {
        src.to_owned()
    }
}

/// Resolves a product link from a card against the storefront origin.
#[must_use]
pub fn absolute_product_url(store_url: &str, href: &str) -> String {
    let href = href.trim();
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_owned();
    }
    let store = store_url.trim_end_matches('/');
    if href.starts_with('/') {
        format!("{store}{href}")
    } else {
        format!("{store}/{href}")
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
