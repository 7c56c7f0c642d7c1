//! CSV artifact handed from the scrape stage to the summarize stage.
//!
//! One row per product. `REVIEWS` holds a JSON array of review texts and
//! `DATES` a JSON array of the same length whose entries are `"YYYY-MM-DD"`
//! or `null`, so position `i` in both columns describes the same review.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDate;
use honeyscope_core::{ProductRow, Review};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ScraperError;

pub const CSV_HEADERS: [&str; 8] = [
    "NAME",
    "IMAGE",
    "URL",
    "PRICE",
    "RATING",
    "NO_OF_REVIEWS",
    "REVIEWS",
    "DATES",
];

#[derive(Debug, Serialize, Deserialize)]
struct CsvRecord {
    #[serde(rename = "NAME")]
    name: String,
    #[serde(rename = "IMAGE")]
    image: String,
    #[serde(rename = "URL")]
    url: String,
    #[serde(rename = "PRICE")]
    price: String,
    #[serde(rename = "RATING")]
    rating: f64,
    #[serde(rename = "NO_OF_REVIEWS")]
    no_of_reviews: u32,
    #[serde(rename = "REVIEWS")]
    reviews: String,
    #[serde(rename = "DATES")]
    dates: String,
}

/// Encodes one list column as a JSON array string.
fn encode_column<T: Serialize + ?Sized>(
    value: &T,
    column: &str,
    product: &str,
) -> Result<String, ScraperError> {
    serde_json::to_string(value).map_err(|source| ScraperError::Serialize {
        context: format!("{column} column for {product}"),
        source,
    })
}

impl CsvRecord {
    fn from_row(row: &ProductRow) -> Result<Self, ScraperError> {
        Ok(Self {
            name: row.name.clone(),
            image: row.image_url.clone(),
            url: row.product_url.clone(),
            price: row.price.to_string(),
            rating: row.rating,
            no_of_reviews: row.review_count,
            reviews: encode_column(&row.review_texts(), "REVIEWS", &row.name)?,
            dates: encode_column(&row.review_dates(), "DATES", &row.name)?,
        })
    }

    fn into_row(self, row_number: usize) -> Result<ProductRow, ScraperError> {
        let column_err = |column: &'static str, reason: String| ScraperError::ArtifactColumn {
            row: row_number,
            column,
            reason,
        };

        let price = Decimal::from_str(self.price.trim())
            .map_err(|e| column_err("PRICE", e.to_string()))?;
        let texts: Vec<String> = serde_json::from_str(&self.reviews)
            .map_err(|e| column_err("REVIEWS", e.to_string()))?;
        let dates: Vec<Option<NaiveDate>> = serde_json::from_str(&self.dates)
            .map_err(|e| column_err("DATES", e.to_string()))?;

        if texts.len() != dates.len() {
            return Err(column_err(
                "DATES",
                format!(
                    "{} dates for {} reviews; every review needs a date or null",
                    dates.len(),
                    texts.len()
                ),
            ));
        }

        let reviews = texts
            .into_iter()
            .zip(dates)
            .map(|(text, date)| Review { text, date })
            .collect();

        Ok(ProductRow {
            name: self.name,
            image_url: self.image,
            product_url: self.url,
            price,
            rating: self.rating,
            review_count: self.no_of_reviews,
            reviews,
        })
    }
}

/// Writes `rows` to `<dir>/<filename>.csv`, creating `dir` if needed.
///
/// A `.csv` suffix already present on `filename` is not doubled. Returns the
/// path written.
///
/// # Errors
///
/// Returns [`ScraperError::Io`] if the directory or file cannot be created,
/// or [`ScraperError::Csv`] if a record cannot be written.
pub fn write_products_csv(
    dir: &Path,
    filename: &str,
    rows: &[ProductRow],
) -> Result<PathBuf, ScraperError> {
    fs::create_dir_all(dir).map_err(|source| ScraperError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let file_name = if Path::new(filename)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
    {
        filename.to_owned()
    } else {
        format!("{filename}.csv")
    };
    let path = dir.join(file_name);

    let file = fs::File::create(&path).map_err(|source| ScraperError::Io {
        path: path.clone(),
        source,
    })?;
    write_products(file, rows)?;

    tracing::info!(path = %path.display(), rows = rows.len(), "CSV file generated");
    Ok(path)
}

/// Writes the header and one record per row to `writer`.
///
/// The header is written even when `rows` is empty.
///
/// # Errors
///
/// Returns [`ScraperError::Csv`] if writing fails.
pub fn write_products<W: io::Write>(writer: W, rows: &[ProductRow]) -> Result<(), ScraperError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(CSV_HEADERS)?;
    for row in rows {
        wtr.serialize(CsvRecord::from_row(row)?)?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Reads a CSV artifact back into product rows.
///
/// # Errors
///
/// Returns [`ScraperError::Io`] if the file cannot be opened, and the
/// errors of [`read_products`] for malformed content.
pub fn read_products_csv(path: &Path) -> Result<Vec<ProductRow>, ScraperError> {
    let file = fs::File::open(path).map_err(|source| ScraperError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_products(file)
}

/// Reads product rows from CSV content with a header line.
///
/// # Errors
///
/// - [`ScraperError::Csv`]: malformed CSV or a non-numeric rating/count.
/// - [`ScraperError::ArtifactColumn`]: bad price, undecodable review/date
///   arrays, or arrays of different lengths.
pub fn read_products<R: io::Read>(reader: R) -> Result<Vec<ProductRow>, ScraperError> {
    let mut rdr = csv::Reader::from_reader(reader);
    rdr.deserialize::<CsvRecord>()
        .enumerate()
        .map(|(index, record)| record?.into_row(index + 1))
        .collect()
}

/// Picks the CSV artifact to summarize from `dir`.
///
/// Returns the first `*.csv` file by file name, so repeated runs over the
/// same directory choose the same file.
///
/// # Errors
///
/// Returns [`ScraperError::Io`] if `dir` cannot be listed, or
/// [`ScraperError::NoArtifact`] if it holds no CSV file.
pub fn find_csv_artifact(dir: &Path) -> Result<PathBuf, ScraperError> {
    let io_err = |source| ScraperError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut candidates = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        let is_csv = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv && path.is_file() {
            candidates.push(path);
        }
    }

    candidates.sort();
    candidates
        .into_iter()
        .next()
        .ok_or_else(|| ScraperError::NoArtifact {
            dir: dir.to_path_buf(),
        })
}
