use super::*;

// -----------------------------------------------------------------------
// calculate_stars
// -----------------------------------------------------------------------

#[test]
fn stars_empty_is_zero() {
    assert!((calculate_stars(Vec::<&str>::new()) - 0.0).abs() < f64::EPSILON);
}

#[test]
fn stars_full_markers_count_one_each() {
    let markers = ["jdgm-star jdgm--on"; 5];
    assert!((calculate_stars(markers) - 5.0).abs() < f64::EPSILON);
}

#[test]
fn stars_half_marker_counts_half() {
    let markers = [
        "jdgm-star jdgm--on",
        "jdgm-star jdgm--on",
        "jdgm-star jdgm--on",
        "jdgm-star jdgm--on",
        "jdgm-star jdgm--half",
    ];
    assert!((calculate_stars(markers) - 4.5).abs() < f64::EPSILON);
}

#[test]
fn stars_off_markers_count_nothing() {
    let markers = [
        "jdgm-star jdgm--on",
        "jdgm-star jdgm--on",
        "jdgm-star jdgm--off",
        "jdgm-star jdgm--off",
        "jdgm-star jdgm--off",
    ];
    assert!((calculate_stars(markers) - 2.0).abs() < f64::EPSILON);
}

#[test]
fn stars_sum_matches_marker_tally_for_every_mix() {
    for on in 0..=5usize {
        for half in 0..=(5 - on) {
            let mut markers = vec!["jdgm-star jdgm--on"; on];
            markers.extend(vec!["jdgm-star jdgm--half"; half]);
            markers.extend(vec!["jdgm-star jdgm--off"; 5 - on - half]);
            #[allow(clippy::cast_precision_loss)]
            let expected = on as f64 + 0.5 * half as f64;
            let got = calculate_stars(markers.iter().copied());
            assert!(
                (got - expected).abs() < f64::EPSILON,
                "on={on} half={half}: expected {expected}, got {got}"
            );
        }
    }
}

#[test]
fn stars_marker_is_never_double_counted() {
    // A class string carrying both tags counts as one full star only.
    let markers = ["jdgm-star jdgm--on jdgm--half"];
    assert!((calculate_stars(markers) - 1.0).abs() < f64::EPSILON);
}

// -----------------------------------------------------------------------
// clean_price
// -----------------------------------------------------------------------

#[test]
fn price_strips_currency_prefix() {
    assert_eq!(clean_price("Rs. 450.00").unwrap(), Decimal::new(45000, 2));
}

#[test]
fn price_strips_thousands_separator_and_whitespace() {
    assert_eq!(
        clean_price("\n   Rs. 1,250.00  ").unwrap(),
        Decimal::new(125_000, 2)
    );
}

#[test]
fn price_without_prefix_parses() {
    assert_eq!(clean_price("399").unwrap(), Decimal::new(399, 0));
}

#[test]
fn price_rejects_non_numeric_text() {
    let err = clean_price("Sold out").unwrap_err();
    assert!(matches!(err, ScraperError::InvalidValue { field: "price", .. }));
}

// -----------------------------------------------------------------------
// clean_review_count
// -----------------------------------------------------------------------

#[test]
fn review_count_plural() {
    assert_eq!(clean_review_count(" 24 reviews ").unwrap(), 24);
}

#[test]
fn review_count_singular() {
    assert_eq!(clean_review_count("1 review").unwrap(), 1);
}

#[test]
fn review_count_with_thousands_separator() {
    assert_eq!(clean_review_count("1,204 reviews").unwrap(), 1204);
}

#[test]
fn review_count_label_only_badge_is_zero() {
    assert_eq!(clean_review_count("No reviews").unwrap(), 0);
    assert_eq!(clean_review_count(" reviews ").unwrap(), 0);
}

#[test]
fn review_count_rejects_other_text() {
    let err = clean_review_count("Be the first to write a review").unwrap_err();
    assert!(matches!(
        err,
        ScraperError::InvalidValue {
            field: "review count",
            ..
        }
    ));
}

// -----------------------------------------------------------------------
// URL helpers
// -----------------------------------------------------------------------

#[test]
fn image_url_protocol_relative_gets_https() {
    assert_eq!(
        absolute_image_url("//cdn.shopify.com/s/files/honey.jpg"),
        "https://cdn.shopify.com/s/files/honey.jpg"
    );
}

#[test]
fn image_url_absolute_is_unchanged() {
    assert_eq!(
        absolute_image_url("https://cdn.shopify.com/honey.jpg"),
        "https://cdn.shopify.com/honey.jpg"
    );
}

#[test]
fn product_url_joins_root_relative_href() {
    assert_eq!(
        absolute_product_url("https://www.scrollingbee.com/", "/products/litchi-honey"),
        "https://www.scrollingbee.com/products/litchi-honey"
    );
}

#[test]
fn product_url_keeps_absolute_href() {
    assert_eq!(
        absolute_product_url("https://www.scrollingbee.com", "https://other.example/p"),
        "https://other.example/p"
    );
}
