//! CSS selectors for the storefront theme and the judge.me widget markup.
//!
//! Class selectors use exact attribute matching (`[class="..."]`) so that
//! `thumbnail-container` does not also match `thumbnail-container has-multiimage`.

use std::sync::LazyLock;

use scraper::{ElementRef, Selector};

pub(crate) const PRODUCT_CARD: &str = r#"div[class="page-width"] div[data-section-id="collection-template"] div[class="row collection-view-items grid--view-items"] > div"#;
pub(crate) const IMAGE_SINGLE: &str = r#"div[class="thumbnail-container"] img"#;
pub(crate) const IMAGE_MULTI: &str = r#"div[class="thumbnail-container has-multiimage"] img"#;
pub(crate) const TITLE_LINK: &str = r#"div[class="product__title"] a"#;
pub(crate) const STAR_MARKER: &str =
    r#"div[class="jdgm-prev-badge"] > span[class="jdgm-prev-badge__stars"] > span"#;
pub(crate) const BADGE_TEXT: &str = r#"div[class="jdgm-prev-badge"] span[class="jdgm-prev-badge__text"]"#;
pub(crate) const PRICE: &str = r#"div[class="product__price"] span[class="product-price__price"]"#;

pub(crate) const LAST_PAGE_LINK: &str =
    r#"a[class="jdgm-paginate__page jdgm-paginate__last-page"]"#;
pub(crate) const PRODUCT_JSON: &str = r#"script[id="ProductJson-nov-product-template"]"#;

pub(crate) const REVIEW_NODE: &str = r#"div[class="jdgm-rev-widg__reviews"] > div"#;
pub(crate) const REVIEW_TITLE: &str = r#"div[class="jdgm-rev__content"] b[class="jdgm-rev__title"]"#;
pub(crate) const REVIEW_BODY: &str = r#"div[class="jdgm-rev__content"] div[class="jdgm-rev__body"]"#;
pub(crate) const REVIEW_TIMESTAMP: &str = r#"span[class="jdgm-rev__timestamp jdgm-spinner"]"#;

fn compile(css: &'static str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid selector {css}: {e}"))
}

pub(crate) static PRODUCT_CARD_SEL: LazyLock<Selector> = LazyLock::new(|| compile(PRODUCT_CARD));
pub(crate) static IMAGE_SINGLE_SEL: LazyLock<Selector> = LazyLock::new(|| compile(IMAGE_SINGLE));
pub(crate) static IMAGE_MULTI_SEL: LazyLock<Selector> = LazyLock::new(|| compile(IMAGE_MULTI));
pub(crate) static TITLE_LINK_SEL: LazyLock<Selector> = LazyLock::new(|| compile(TITLE_LINK));
pub(crate) static STAR_MARKER_SEL: LazyLock<Selector> = LazyLock::new(|| compile(STAR_MARKER));
pub(crate) static BADGE_TEXT_SEL: LazyLock<Selector> = LazyLock::new(|| compile(BADGE_TEXT));
pub(crate) static PRICE_SEL: LazyLock<Selector> = LazyLock::new(|| compile(PRICE));
pub(crate) static LAST_PAGE_LINK_SEL: LazyLock<Selector> =
    LazyLock::new(|| compile(LAST_PAGE_LINK));
pub(crate) static PRODUCT_JSON_SEL: LazyLock<Selector> = LazyLock::new(|| compile(PRODUCT_JSON));
pub(crate) static REVIEW_NODE_SEL: LazyLock<Selector> = LazyLock::new(|| compile(REVIEW_NODE));
pub(crate) static REVIEW_TITLE_SEL: LazyLock<Selector> = LazyLock::new(|| compile(REVIEW_TITLE));
pub(crate) static REVIEW_BODY_SEL: LazyLock<Selector> = LazyLock::new(|| compile(REVIEW_BODY));
pub(crate) static REVIEW_TIMESTAMP_SEL: LazyLock<Selector> =
    LazyLock::new(|| compile(REVIEW_TIMESTAMP));

/// First non-blank text node under the first element matching `selector`.
pub(crate) fn first_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope
        .select(selector)
        .next()?
        .text()
        .map(str::trim)
        .find(|t| !t.is_empty())
        .map(str::to_owned)
}

/// Value of `attr` on the first element matching `selector`.
pub(crate) fn first_attr<'a>(
    scope: ElementRef<'a>,
    selector: &Selector,
    attr: &str,
) -> Option<&'a str> {
    scope.select(selector).next()?.value().attr(attr)
}
