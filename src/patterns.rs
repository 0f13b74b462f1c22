//! Text helpers for turning listing text into product fields

use std::str::FromStr;
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use rust_decimal::Decimal;

use crate::error::ItemError;

/// Catalog colors, longest first so "Space Gray" wins over "Gray"
const COLORS: &[&str] = &[
    "Product Red",
    "Space Gray",
    "Space Grey",
    "Jet Black",
    "Rose Gold",
    "Silver",
    "Yellow",
    "Coral",
    "Black",
    "White",
    "Green",
    "Purple",
    "Gold",
    "Gray",
    "Grey",
    "Blue",
    "Red",
];

static STORAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d+)\s?(GB|Gb|gb|TB|Tb|tb)\b").expect("storage regex"));

static COLOR: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = COLORS
        .iter()
        .map(|c| regex::escape(c))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b({alternation})\b")).expect("color regex")
});

static PRICE_NOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^()]*\)\s*$").expect("price note regex"));

static PRICE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:\$|€|₽|£)?(?P<amount>\d(?:[\d.,]*\d)?)(?:руб\.?|р\.|₽|€|\$|£)?$")
        .expect("price regex")
});

/// Anchor a title pattern so it must match the whole text
pub fn anchored(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{pattern})$"))
}

/// Captured groups of an anchored pattern, zero-indexed from the first
/// declared group. Optional groups that did not participate are empty.
pub fn group_extractor(text: &str, pattern: &Regex) -> Result<Vec<String>, ItemError> {
    let caps = pattern
        .captures(text)
        .ok_or_else(|| ItemError::PatternMismatch {
            text: text.to_string(),
            pattern: pattern.as_str().to_string(),
        })?;

    Ok(caps
        .iter()
        .skip(1)
        .map(|m| m.map(|m| m.as_str().to_string()).unwrap_or_default())
        .collect())
}

/// Recognized parameter markers in free text.
///
/// Keys are inserted as `color` then `storage`; anything else is ignored.
pub fn extract_parameters(text: &str) -> IndexMap<String, String> {
    let mut params = IndexMap::new();

    if let Some(m) = COLOR.captures(text).and_then(|c| c.get(1)) {
        let found = m.as_str();
        let canonical = COLORS
            .iter()
            .find(|c| c.eq_ignore_ascii_case(found))
            .copied()
            .unwrap_or(found);
        params.insert("color".to_string(), canonical.to_string());
    }

    if let Some(caps) = STORAGE.captures(text) {
        params.insert("storage".to_string(), format!("{}{}", &caps[1], &caps[2]));
    }

    params
}

/// Serialize parameters as `key=value` pairs joined by `;`
pub fn params_to_string(params: &IndexMap<String, String>) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(";")
}

/// Parse a displayed price like "$1 299", "1.299,50 €" or "49 990 руб."
///
/// Only digits, separators, one currency marker and a trailing parenthesised
/// note are accepted; badges such as "-15%" or "2 шт" are not prices.
pub fn parse_price(text: &str) -> Option<Decimal> {
    let text = PRICE_NOTE.replace(text, "");
    // is_whitespace covers NBSP and thin spaces used as digit grouping
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let amount = PRICE.captures(&compact)?.name("amount")?.as_str();

    Decimal::from_str(&normalize_separators(amount)).ok()
}

/// The last separator is the decimal point when both kinds appear. A single
/// kind repeated is digit grouping; a lone comma followed by three digits is
/// grouping too.
fn normalize_separators(amount: &str) -> String {
    let commas = amount.matches(',').count();
    let dots = amount.matches('.').count();

    match (commas, dots) {
        (0, 0) => amount.to_string(),
        (_, 0) if commas > 1 => amount.replace(',', ""),
        (1, 0) => match amount.split_once(',') {
            Some((_, tail)) if tail.len() == 3 => amount.replace(',', ""),
            _ => amount.replace(',', "."),
        },
        (0, _) if dots > 1 => amount.replace('.', ""),
        (0, _) => amount.to_string(),
        _ => {
            let comma_last = amount.rfind(',') > amount.rfind('.');
            if comma_last {
                amount.replace('.', "").replace(',', ".")
            } else {
                amount.replace(',', "")
            }
        }
    }
}
