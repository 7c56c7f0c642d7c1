//! Paginated review extraction from the judge.me reviews widget.

use std::borrow::Cow;

use chrono::{NaiveDate, NaiveDateTime};
use honeyscope_core::Review;
use scraper::{ElementRef, Html};
use serde::Deserialize;

use crate::error::ScraperError;
use crate::fetch::PageFetcher;
use crate::selectors::{
    first_attr, REVIEW_BODY_SEL, REVIEW_NODE_SEL, REVIEW_TIMESTAMP_SEL, REVIEW_TITLE_SEL,
};

/// Page size requested from the widget endpoint.
pub const REVIEWS_PER_PAGE: u32 = 10;

/// Timestamp layout in `data-content`, minus the trailing zone name.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Deserialize)]
struct WidgetResponse {
    html: String,
}

/// Pages through the reviews widget for one product at a time.
#[derive(Debug, Clone)]
pub struct ReviewExtractor {
    fetcher: PageFetcher,
    widget_url: String,
    shop_domain: String,
}

impl ReviewExtractor {
    #[must_use]
    pub fn new(
        fetcher: PageFetcher,
        widget_url: impl Into<String>,
        shop_domain: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            widget_url: widget_url.into(),
            shop_domain: shop_domain.into(),
        }
    }

    /// Fetches widget pages `1..=last_page` in order and returns every review.
    ///
    /// Pages are requested sequentially and not deduplicated. A review whose
    /// timestamp cannot be read keeps its text and gets `date: None`.
    ///
    /// # Errors
    ///
    /// Propagates any fetch error from [`PageFetcher::fetch_json`] and
    /// [`ScraperError::InvalidUrl`] if the widget URL is malformed.
    pub async fn extract(
        &self,
        product_id: u64,
        last_page: u32,
    ) -> Result<Vec<Review>, ScraperError> {
        let mut reviews = Vec::new();

        for page in 1..=last_page {
            let url = self.page_url(product_id, page)?;
            let response: WidgetResponse = self
                .fetcher
                .fetch_json(&url, "reviews widget page")
                .await?;

            let page_reviews = parse_reviews_fragment(&unescape_fragment(&response.html));
            tracing::debug!(product_id, page, count = page_reviews.len(), "parsed review page");
            reviews.extend(page_reviews);
        }

        Ok(reviews)
    }

    /// Builds the widget URL for one page of one product's reviews.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidUrl`] if `widget_url` cannot be parsed.
    pub fn page_url(&self, product_id: u64, page: u32) -> Result<String, ScraperError> {
        let mut url =
            reqwest::Url::parse(&self.widget_url).map_err(|e| ScraperError::InvalidUrl {
                url: self.widget_url.clone(),
                reason: e.to_string(),
            })?;

        url.query_pairs_mut()
            .append_pair("url", &self.shop_domain)
            .append_pair("shop_domain", &self.shop_domain)
            .append_pair("platform", "shopify")
            .append_pair("page", &page.to_string())
            .append_pair("per_page", &REVIEWS_PER_PAGE.to_string())
            .append_pair("product_id", &product_id.to_string());

        Ok(url.to_string())
    }
}

/// Undoes entity escaping when the widget ships its markup as text.
///
/// Markup that already contains tags is returned unchanged; the HTML parser
/// decodes entities inside text nodes on its own.
pub(crate) fn unescape_fragment(raw: &str) -> Cow<'_, str> {
    if raw.contains('<') || !raw.contains("&lt;") {
        return Cow::Borrowed(raw);
    }
    let decoded: String = Html::parse_fragment(raw).root_element().text().collect();
    Cow::Owned(decoded)
}

/// Parses every review node in one widget HTML fragment.
#[must_use]
pub fn parse_reviews_fragment(fragment: &str) -> Vec<Review> {
    let html = Html::parse_fragment(fragment);
    html.root_element()
        .select(&REVIEW_NODE_SEL)
        .map(parse_review_node)
        .collect()
}

fn parse_review_node(node: ElementRef<'_>) -> Review {
    let title = node
        .select(&REVIEW_TITLE_SEL)
        .next()
        .and_then(|el| el.text().next())
        .unwrap_or_default();

    let body: String = node
        .select(&REVIEW_BODY_SEL)
        .flat_map(|el| el.text())
        .collect();

    let text = Review::compose_text(title, &body);

    let date = match first_attr(node, &REVIEW_TIMESTAMP_SEL, "data-content") {
        Some(raw) => {
            let parsed = parse_review_date(raw);
            if parsed.is_none() {
                tracing::error!(raw, "unable to parse review date");
            }
            parsed
        }
        None => {
            tracing::error!("unable to get review date: timestamp element missing");
            None
        }
    };

    Review { text, date }
}

/// Parses a widget timestamp such as `"2023-04-12 10:31:22 UTC"` into its date.
///
/// The trailing zone name is ignored.
#[must_use]
pub fn parse_review_date(raw: &str) -> Option<NaiveDate> {
    let (stamp, _zone) = raw.trim().rsplit_once(' ')?;
    NaiveDateTime::parse_from_str(stamp.trim(), TIMESTAMP_FORMAT)
        .ok()
        .map(|dt| dt.date())
}
