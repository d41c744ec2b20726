//! CSS selectors for Steam store search pages.
//!
//! Update this file when Steam changes the search page markup, and add a fixture
//! under `tests/fixtures` capturing the new layout.

use scraper::Selector;
use std::sync::LazyLock;

/// Selectors for the search results page.
pub mod search {
    use super::*;

    /// One result row.
    pub static RESULT: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("a.search_result_row").unwrap());

    /// Title inside a result row.
    pub static TITLE: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("span.title").unwrap());

    /// Pre-discount price, only present while a discount runs.
    pub static PRICE_ORIGINAL: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse(".discount_original_price").unwrap());

    /// Current price in the discount block layout.
    pub static PRICE_FINAL: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse(".discount_final_price").unwrap());

    /// Legacy price container holding one or two prices.
    pub static PRICE_LEGACY: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("div.search_price").unwrap());
}

/// Selectors for pages that are not search results.
pub mod errors {
    use super::*;

    /// Age gate shown instead of results.
    pub static AGE_GATE: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("#app_agegate, .agegate_birthday_selector").unwrap());

    /// Generic store error box.
    pub static ERROR_BOX: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("#error_box").unwrap());
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn test_selectors_compile() {
        let _ = &*search::RESULT;
        let _ = &*search::TITLE;
        let _ = &*search::PRICE_ORIGINAL;
        let _ = &*search::PRICE_FINAL;
        let _ = &*search::PRICE_LEGACY;
        let _ = &*errors::AGE_GATE;
        let _ = &*errors::ERROR_BOX;
    }

    #[test]
    fn test_basic_selector_matching() {
        let html = Html::parse_document(
            r#"<div id="search_resultsRows">
                <a class="search_result_row" href="https://store.steampowered.com/app/220/">
                    <span class="title">Half-Life 2</span>
                    <div class="discount_final_price">₹ 319</div>
                </a>
            </div>"#,
        );

        let rows: Vec<_> = html.select(&search::RESULT).collect();
        assert_eq!(rows.len(), 1);

        let title = rows[0].select(&search::TITLE).next().map(|e| e.text().collect::<String>());
        assert_eq!(title.as_deref(), Some("Half-Life 2"));
    }
}
