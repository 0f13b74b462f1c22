//! Product extraction from retailer pages
//!
//! Each item source has its own module that reads the raw title, parameter
//! text and price off a candidate node. The flow shared by all of them lives
//! here: selecting candidates, the group header, title matching and building
//! the final [`Product`].

mod data_attribute;
mod inline;

use rust_decimal::Decimal;
use scraper::{ElementRef, Html};
use tracing::{debug, warn};

use crate::error::ItemError;
use crate::model::Product;
use crate::patterns::{extract_parameters, group_extractor, params_to_string};
use crate::rules::{CompiledRule, ItemSource};

/// What an item source reads off one candidate node
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RawItem {
    pub title: String,
    /// Fallback text for parameter extraction
    pub details: String,
    pub price: Option<Decimal>,
}

/// Parse a page once and run every rule over it, in rule order
pub fn extract_page(html: &str, rules: &[&CompiledRule]) -> Vec<Product> {
    let document = Html::parse_document(html);
    rules
        .iter()
        .flat_map(|rule| extract_products(&document, rule))
        .collect()
}

/// All products a rule finds in a document, in document order
pub fn extract_products(document: &Html, rule: &CompiledRule) -> Vec<Product> {
    let product_type = rule.product_type();
    let mut nodes = document.select(&rule.items);

    let header = if rule.rule.group_header {
        match nodes.next() {
            Some(node) => Some(visible_text(&node)),
            None => {
                debug!(?product_type, selector = %rule.rule.item_selector, "no items on page");
                return Vec::new();
            }
        }
    } else {
        None
    };

    let mut products = Vec::new();
    for (index, node) in nodes.enumerate() {
        if visible_text(&node).is_empty() {
            continue;
        }

        let raw = match &rule.rule.source {
            ItemSource::Inline { text, trim_suffix } => {
                Ok(Some(inline::read_item(&node, *text, *trim_suffix, rule.prices.as_ref())))
            }
            ItemSource::DataAttribute {
                attribute,
                name_field,
                price_field,
            } => data_attribute::read_item(&node, attribute, name_field, price_field),
        };

        let product = raw.and_then(|raw| match raw {
            Some(raw) => build_product(raw, header.as_deref(), rule),
            None => Ok(None),
        });

        match product {
            Ok(Some(product)) => {
                if product.price.is_none() {
                    debug!(
                        ?product_type,
                        selector = %rule.rule.item_selector,
                        title = %product.title,
                        "price not found"
                    );
                }
                products.push(product);
            }
            Ok(None) => {}
            Err(e @ ItemError::PatternMismatch { .. }) => {
                debug!(?product_type, index, "skipping item: {}", e);
            }
            Err(e) => {
                warn!(?product_type, index, "skipping item: {}", e);
            }
        }
    }

    products
}

/// Apply the title pattern and capture layout to a raw item
fn build_product(
    raw: RawItem,
    header: Option<&str>,
    rule: &CompiledRule,
) -> Result<Option<Product>, ItemError> {
    if let Some(exclude) = &rule.exclude {
        if exclude.is_match(&raw.title) {
            debug!(
                product_type = ?rule.product_type(),
                title = %raw.title,
                pattern = %exclude.as_str(),
                "skipping item: excluded"
            );
            return Ok(None);
        }
    }

    let groups = group_extractor(&raw.title, &rule.title)?;
    let group = |i: usize| groups[i].trim().to_string();
    let layout = &rule.rule.layout;

    let title = if layout.title.is_empty() {
        raw.title.trim().to_string()
    } else {
        layout
            .title
            .iter()
            .map(|&i| group(i))
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    };

    let description = match (layout.description, header) {
        (Some(i), _) => group(i),
        (None, Some(header)) => header.to_string(),
        (None, None) => String::new(),
    };

    let details = layout.parameters.map(group).unwrap_or(raw.details);

    Ok(Some(Product {
        title,
        description,
        price: raw.price,
        product_type: rule.product_type(),
        parameters: params_to_string(&extract_parameters(&details)),
    }))
}

/// Text of a node and its descendants, one space between text nodes
pub(crate) fn visible_text(node: &ElementRef) -> String {
    node.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
