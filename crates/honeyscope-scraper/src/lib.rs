//! Storefront scraping for honeyscope.
//!
//! Fetches the collection page, reads each product card, pages through the
//! judge.me reviews widget for every product, and writes the assembled rows
//! to the CSV artifact consumed by the summarizer.

pub mod artifact;
pub mod error;
pub mod fetch;
pub mod listing;
pub mod normalize;
pub mod reviews;

mod retry;
mod selectors;

pub use artifact::{find_csv_artifact, read_products_csv, write_products_csv, CSV_HEADERS};
pub use error::ScraperError;
pub use fetch::PageFetcher;
pub use listing::{ListingScraper, ProductCard, ProductPage, ScrapeOutcome};
pub use normalize::calculate_stars;
pub use reviews::{ReviewExtractor, REVIEWS_PER_PAGE};
