//! Three-tier DOM extraction for the BCV rate.
//!
//! The page exposes the USD value through no single stable selector, so
//! extraction works over an HTML snapshot with three ordered strategies,
//! first success wins:
//!
//! 1. A `<span>` labeled exactly "USD", then the first `<strong>` in its
//!    closest `.row` ancestor.
//! 2. The `#dolar` container, then the first `<strong>` inside it.
//! 3. Any `<strong>` on the page whose text looks like a plausible rate
//!    (shape `\d{1,3}[,.]?\d{2,8}`, value strictly between 10 and 200).
//!
//! Working on a snapshot keeps every tier testable against fixture HTML
//! without a live browser.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

/// Numeric shape for strategy 3 candidates: 1-3 leading digits, an
/// optional comma or dot separator, 2-8 trailing digits.
const RATE_SHAPE: &str = r"^\d{1,3}[,.]?\d{2,8}$";

/// Plausibility band for pattern-scanned candidates (open interval).
/// Structurally anchored strategies 1 and 2 bypass this on purpose.
const RATE_MIN: f64 = 10.0;
const RATE_MAX: f64 = 200.0;

/// Run the three strategies in order against an HTML snapshot and return
/// the first raw rate text found.
pub fn extract_rate_text(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    usd_label_strategy(&document)
        .or_else(|| dolar_anchor_strategy(&document))
        .or_else(|| pattern_scan_strategy(&document))
}

/// Strategy 1: find the span labeled "USD" and read the bold value from
/// the enclosing row.
fn usd_label_strategy(document: &Html) -> Option<String> {
    let span_selector = Selector::parse("span").unwrap();
    let strong_selector = Selector::parse("strong").unwrap();

    let label = document
        .select(&span_selector)
        .find(|el| el.text().collect::<String>().trim() == "USD")?;

    // Closest ancestor carrying the "row" class
    let row = label
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().classes().any(|c| c == "row"))?;

    let strong = row.select(&strong_selector).next()?;
    non_empty_text(&strong)
}

/// Strategy 2: well-known `#dolar` container.
fn dolar_anchor_strategy(document: &Html) -> Option<String> {
    let dolar_selector = Selector::parse("#dolar").unwrap();
    let strong_selector = Selector::parse("strong").unwrap();

    let container = document.select(&dolar_selector).next()?;
    let strong = container.select(&strong_selector).next()?;
    non_empty_text(&strong)
}

/// Strategy 3: scan every bold element for text shaped like a rate within
/// the plausibility band.
fn pattern_scan_strategy(document: &Html) -> Option<String> {
    let strong_selector = Selector::parse("strong").unwrap();
    let shape = Regex::new(RATE_SHAPE).unwrap();

    for strong in document.select(&strong_selector) {
        let text = strong.text().collect::<String>().trim().to_string();
        let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();

        if !shape.is_match(&compact) {
            continue;
        }

        if let Ok(value) = compact.replace(',', ".").parse::<f64>() {
            if value > RATE_MIN && value < RATE_MAX {
                return Some(text);
            }
        }
    }

    None
}

fn non_empty_text(element: &ElementRef) -> Option<String> {
    let text = element.text().collect::<String>().trim().to_string();
    (!text.is_empty()).then_some(text)
}

/// Normalize raw extracted text into a validated rate.
///
/// Strips everything but digits, comma, and dot, treats the comma as a
/// decimal point, and rejects anything non-finite or not strictly
/// positive. Parsing is whole-string: leftover garbage like a second
/// separator fails here instead of being silently truncated.
pub fn normalize_rate(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect::<String>()
        .replace(',', ".");

    let value = cleaned.parse::<f64>().ok()?;
    (value.is_finite() && value > 0.0).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usd_label_row() {
        let html = r#"
            <html><body>
              <div class="row">
                <span>USD</span>
                <strong>40,1234</strong>
              </div>
            </body></html>
        "#;
        assert_eq!(extract_rate_text(html).as_deref(), Some("40,1234"));
    }

    #[test]
    fn test_usd_label_nested_in_row() {
        // Label and value live in sibling columns of the same row
        let html = r#"
            <div class="view-content">
              <div class="row recuadrotsmc">
                <div class="col-sm-6"><span>USD</span></div>
                <div class="col-sm-6"><strong> 36,54 </strong></div>
              </div>
            </div>
        "#;
        assert_eq!(extract_rate_text(html).as_deref(), Some("36,54"));
    }

    #[test]
    fn test_dolar_anchor_fallback() {
        let html = r#"
            <html><body>
              <div id="dolar"><strong>  38.75 </strong></div>
            </body></html>
        "#;
        assert_eq!(extract_rate_text(html).as_deref(), Some("38.75"));
    }

    #[test]
    fn test_label_wins_over_anchor() {
        // Both shapes present: the labeled row must win
        let html = r#"
            <div class="row"><span>USD</span><strong>40,00</strong></div>
            <div id="dolar"><strong>99,99</strong></div>
        "#;
        assert_eq!(extract_rate_text(html).as_deref(), Some("40,00"));
    }

    #[test]
    fn test_anchor_wins_over_pattern_scan() {
        let html = r#"
            <strong>55,55</strong>
            <div id="dolar"><strong>38,00</strong></div>
        "#;
        assert_eq!(extract_rate_text(html).as_deref(), Some("38,00"));
    }

    #[test]
    fn test_pattern_scan_skips_out_of_band() {
        // 250.00 and 5.00 fall outside (10, 200); 15,40 is the first
        // plausible candidate
        let html = r#"
            <strong>250,00</strong>
            <strong>5,00</strong>
            <strong>15,40</strong>
        "#;
        assert_eq!(extract_rate_text(html).as_deref(), Some("15,40"));
    }

    #[test]
    fn test_pattern_scan_rejects_malformed_shapes() {
        // 4 leading digits / 1 trailing digit don't match the shape
        let html = r#"
            <strong>1234,56</strong>
            <strong>36,5</strong>
            <strong>texto</strong>
        "#;
        assert_eq!(extract_rate_text(html), None);
    }

    #[test]
    fn test_pattern_scan_tolerates_inner_whitespace() {
        let html = "<strong>36, 54</strong>";
        assert_eq!(extract_rate_text(html).as_deref(), Some("36, 54"));
    }

    #[test]
    fn test_no_value_anywhere() {
        let html = "<html><body><p>Sin datos</p></body></html>";
        assert_eq!(extract_rate_text(html), None);
    }

    #[test]
    fn test_usd_label_without_row_falls_through() {
        // Label present but no .row ancestor: strategy 2 takes over
        let html = r#"
            <div><span>USD</span><strong>40,00</strong></div>
            <div id="dolar"><strong>38,00</strong></div>
        "#;
        assert_eq!(extract_rate_text(html).as_deref(), Some("38,00"));
    }

    #[test]
    fn test_normalize_comma_decimal() {
        assert_eq!(normalize_rate("36,54"), Some(36.54));
    }

    #[test]
    fn test_normalize_strips_currency_noise() {
        assert_eq!(normalize_rate("36,54 Bs"), Some(36.54));
        assert_eq!(normalize_rate(" 40,1234 "), Some(40.1234));
    }

    #[test]
    fn test_normalize_dot_decimal_passthrough() {
        assert_eq!(normalize_rate("38.75"), Some(38.75));
    }

    #[test]
    fn test_normalize_rejects_zero() {
        assert_eq!(normalize_rate("0"), None);
        assert_eq!(normalize_rate("0,00"), None);
    }

    #[test]
    fn test_normalize_rejects_unparseable() {
        assert_eq!(normalize_rate(""), None);
        assert_eq!(normalize_rate("sin valor"), None);
        // Two separators survive cleaning and must fail the strict parse
        assert_eq!(normalize_rate("1.234,56"), None);
        // The dot in a currency prefix survives cleaning too: ".36.54"
        // must be rejected rather than truncated to a garbage 0.36
        assert_eq!(normalize_rate("Bs. 36,54"), None);
    }
}
