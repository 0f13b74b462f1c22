//! Items described by a JSON object in a node attribute
//!
//! Some listings render each product as
//! `<div data-params='{"shortName": "...", "price": 19990}'>`; the object is
//! the only reliable source for the name and price.

use scraper::ElementRef;
use serde_json::Value;

use super::RawItem;
use crate::error::ItemError;
use crate::patterns::parse_price;

/// `Ok(None)` when the node carries no payload at all
pub(crate) fn read_item(
    node: &ElementRef,
    attribute: &str,
    name_field: &str,
    price_field: &str,
) -> Result<Option<RawItem>, ItemError> {
    let payload = match node.value().attr(attribute) {
        Some(p) if !p.trim().is_empty() => p,
        _ => return Ok(None),
    };

    let object: Value = serde_json::from_str(payload).map_err(|source| ItemError::Decode {
        payload: payload.to_string(),
        source,
    })?;

    let name = object
        .get(name_field)
        .and_then(Value::as_str)
        .ok_or_else(|| ItemError::MissingField {
            field: name_field.to_string(),
            payload: payload.to_string(),
        })?;

    let price = match object.get(price_field) {
        Some(Value::Number(n)) => parse_price(&n.to_string()),
        Some(Value::String(s)) => parse_price(s),
        _ => None,
    };

    Ok(Some(RawItem {
        title: name.trim().to_string(),
        details: name.to_string(),
        price,
    }))
}
