//! Collection page scraping: product cards plus their reviews.

use honeyscope_core::ProductRow;
use rust_decimal::Decimal;
use scraper::{ElementRef, Html};
use serde::Deserialize;

use crate::error::ScraperError;
use crate::fetch::PageFetcher;
use crate::normalize::{
    absolute_image_url, absolute_product_url, calculate_stars, clean_price, clean_review_count,
};
use crate::reviews::ReviewExtractor;
use crate::selectors::{
    first_attr, first_text, BADGE_TEXT, BADGE_TEXT_SEL, IMAGE_MULTI, IMAGE_MULTI_SEL,
    IMAGE_SINGLE_SEL, LAST_PAGE_LINK_SEL, PRICE, PRICE_SEL, PRODUCT_CARD_SEL, PRODUCT_JSON,
    PRODUCT_JSON_SEL, STAR_MARKER_SEL, TITLE_LINK, TITLE_LINK_SEL,
};

/// Fields read from one product card on the collection page.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductCard {
    pub name: String,
    pub image_url: String,
    pub product_url: String,
    pub price: Decimal,
    pub rating: f64,
    pub review_count: u32,
}

/// Review pagination data embedded in a product page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductPage {
    pub product_id: u64,
    /// Number of widget pages to fetch. `1` when the page has no pagination links.
    pub last_page: u32,
}

#[derive(Debug, Deserialize)]
struct ProductJson {
    id: u64,
}

/// Result of a listing scrape that got past the collection page.
#[derive(Debug)]
pub enum ScrapeOutcome {
    /// Every product card was scraped.
    Complete { rows: Vec<ProductRow> },
    /// Scraping stopped at the first failing product. `rows` holds the
    /// products before it; later products were never attempted.
    Partial {
        rows: Vec<ProductRow>,
        total: usize,
        /// 1-based position of the failing product card.
        failed_index: usize,
        error: ScraperError,
    },
}

impl ScrapeOutcome {
    #[must_use]
    pub fn rows(&self) -> &[ProductRow] {
        match self {
            Self::Complete { rows } | Self::Partial { rows, .. } => rows,
        }
    }

    #[must_use]
    pub fn into_rows(self) -> Vec<ProductRow> {
        match self {
            Self::Complete { rows } | Self::Partial { rows, .. } => rows,
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete { .. })
    }
}

/// Scrapes a collection page and the reviews of every product on it.
#[derive(Debug, Clone)]
pub struct ListingScraper {
    fetcher: PageFetcher,
    reviews: ReviewExtractor,
    store_url: String,
}

impl ListingScraper {
    #[must_use]
    pub fn new(fetcher: PageFetcher, reviews: ReviewExtractor, store_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            reviews,
            store_url: store_url.into(),
        }
    }

    /// Scrapes every product card on `collection_url`, in page order.
    ///
    /// Products are processed one at a time. The first product that fails
    /// (missing card field, product page fetch, review page fetch) ends the
    /// run with [`ScrapeOutcome::Partial`]; the caller decides whether the
    /// rows gathered so far are worth keeping.
    ///
    /// # Errors
    ///
    /// Returns an error only when the collection page itself cannot be fetched.
    pub async fn scrape(&self, collection_url: &str) -> Result<ScrapeOutcome, ScraperError> {
        let cards = {
            let doc = self.fetcher.fetch_document(collection_url).await?;
            parse_collection_page(&doc, &self.store_url)
        };

        let total = cards.len();
        tracing::info!(total, url = collection_url, "found products");

        let mut rows = Vec::with_capacity(total);
        for (index, card) in cards.into_iter().enumerate() {
            let position = index + 1;
            match self.scrape_product(card).await {
                Ok(row) => rows.push(row),
                Err(error) => {
                    tracing::error!(
                        product = position,
                        total,
                        error = %error,
                        details = ?error,
                        "issue with product, stopping scrape"
                    );
                    return Ok(ScrapeOutcome::Partial {
                        rows,
                        total,
                        failed_index: position,
                        error,
                    });
                }
            }
        }

        tracing::info!(count = rows.len(), "fetched all products");
        Ok(ScrapeOutcome::Complete { rows })
    }

    async fn scrape_product(
        &self,
        card: Result<ProductCard, ScraperError>,
    ) -> Result<ProductRow, ScraperError> {
        let card = card?;
        tracing::info!(product = %card.name, "fetching reviews");

        let page = {
            let doc = self.fetcher.fetch_document(&card.product_url).await?;
            parse_product_page(&doc, &card.product_url)?
        };

        let reviews = self.reviews.extract(page.product_id, page.last_page).await?;
        tracing::info!(
            product = %card.name,
            total = reviews.len(),
            undated = reviews.iter().filter(|r| r.date.is_none()).count(),
            "total reviews found"
        );

        Ok(ProductRow {
            name: card.name,
            image_url: card.image_url,
            product_url: card.product_url,
            price: card.price,
            rating: card.rating,
            review_count: card.review_count,
            reviews,
        })
    }
}

/// Parses every product card on a collection page.
///
/// Each card is parsed independently so one malformed card does not hide
/// the others from the caller.
#[must_use]
pub fn parse_collection_page(
    doc: &Html,
    store_url: &str,
) -> Vec<Result<ProductCard, ScraperError>> {
    doc.root_element()
        .select(&PRODUCT_CARD_SEL)
        .enumerate()
        .map(|(index, card)| parse_product_card(card, store_url, index + 1))
        .collect()
}

/// Reads one product card.
///
/// The image comes from the single-image container, falling back to the
/// multi-image container used by cards with hover images.
///
/// # Errors
///
/// Returns [`ScraperError::MissingElement`] when a required field is absent,
/// or [`ScraperError::InvalidValue`] when the price or review count is not numeric.
pub fn parse_product_card(
    card: ElementRef<'_>,
    store_url: &str,
    position: usize,
) -> Result<ProductCard, ScraperError> {
    let page = format!("product card {position}");
    let missing = |selector: &'static str| ScraperError::MissingElement {
        selector,
        page: page.clone(),
    };

    let image_src = first_attr(card, &IMAGE_SINGLE_SEL, "src")
        .or_else(|| first_attr(card, &IMAGE_MULTI_SEL, "src"))
        .ok_or_else(|| missing(IMAGE_MULTI))?;

    let name = first_text(card, &TITLE_LINK_SEL).ok_or_else(|| missing(TITLE_LINK))?;
    let href = first_attr(card, &TITLE_LINK_SEL, "href").ok_or_else(|| missing(TITLE_LINK))?;

    let rating = calculate_stars(
        card.select(&STAR_MARKER_SEL)
            .map(|marker| marker.value().attr("class").unwrap_or_default()),
    );

    let review_count_text = first_text(card, &BADGE_TEXT_SEL).ok_or_else(|| missing(BADGE_TEXT))?;
    let price_text = first_text(card, &PRICE_SEL).ok_or_else(|| missing(PRICE))?;

    Ok(ProductCard {
        name,
        image_url: absolute_image_url(image_src),
        product_url: absolute_product_url(store_url, href),
        price: clean_price(&price_text)?,
        rating,
        review_count: clean_review_count(&review_count_text)?,
    })
}

/// Reads the product id and last review page from a product page.
///
/// # Errors
///
/// - [`ScraperError::MissingElement`]: the product JSON script is absent.
/// - [`ScraperError::Deserialize`]: the product JSON has no numeric `id`.
/// - [`ScraperError::InvalidValue`]: the last-page link has a non-numeric `data-page`.
pub fn parse_product_page(doc: &Html, url: &str) -> Result<ProductPage, ScraperError> {
    let root = doc.root_element();

    let last_page = match first_attr(root, &LAST_PAGE_LINK_SEL, "data-page") {
        Some(raw) => raw
            .trim()
            .parse::<u32>()
            .map_err(|e| ScraperError::InvalidValue {
                field: "last review page",
                value: raw.to_owned(),
                reason: e.to_string(),
            })?,
        None => 1,
    };

    let raw_json: String = root
        .select(&PRODUCT_JSON_SEL)
        .next()
        .ok_or_else(|| ScraperError::MissingElement {
            selector: PRODUCT_JSON,
            page: url.to_owned(),
        })?
        .text()
        .collect();

    let product: ProductJson =
        serde_json::from_str(raw_json.trim()).map_err(|source| ScraperError::Deserialize {
            context: format!("product JSON on {url}"),
            source,
        })?;

    Ok(ProductPage {
        product_id: product.id,
        last_page,
    })
}

#[cfg(test)]
#[path = "listing_test.rs"]
mod tests;
