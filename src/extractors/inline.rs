//! Items whose title and prices are the node's own markup

use scraper::{ElementRef, Selector};

use super::{visible_text, RawItem};
use crate::patterns::parse_price;
use crate::rules::TitleText;

pub(crate) fn read_item(
    node: &ElementRef,
    text: TitleText,
    trim_suffix: usize,
    prices: Option<&Selector>,
) -> RawItem {
    let title = match text {
        TitleText::FirstTextNode => node
            .children()
            .filter_map(|child| child.value().as_text())
            .map(|t| t.trim())
            .find(|t| !t.is_empty())
            .unwrap_or_default()
            .to_string(),
        TitleText::FullText => visible_text(node),
    };

    RawItem {
        title: drop_suffix(&title, trim_suffix),
        details: visible_text(node),
        price: read_price(node, prices),
    }
}

/// Later price nodes override earlier ones, so a struck-out list price
/// followed by the current price resolves to the current price.
fn read_price(node: &ElementRef, prices: Option<&Selector>) -> Option<rust_decimal::Decimal> {
    let parsed = |el: ElementRef| parse_price(&visible_text(&el));

    match prices {
        Some(selector) => node.select(selector).filter_map(parsed).last(),
        None => node
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|el| el.value().name() == "span")
            .filter_map(parsed)
            .last(),
    }
}

fn drop_suffix(title: &str, len: usize) -> String {
    let keep = title.chars().count().saturating_sub(len);
    title.chars().take(keep).collect::<String>().trim_end().to_string()
}
