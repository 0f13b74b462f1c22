//! Per-provider product-type rules
//!
//! A rule says where a product type's items live on a retailer page and how
//! their text maps onto product fields. Rules are plain serde data so they can
//! come from JSON config; [`CompiledRule`] holds the parsed selectors and
//! patterns and is validated once, before any page is fetched.

use indexmap::IndexMap;
use regex::Regex;
use scraper::Selector;
use serde::{Deserialize, Serialize};

use crate::error::RuleError;
use crate::model::ProductType;
use crate::patterns::anchored;

/// Location and parsing info for one product type on one provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductTypeRule {
    pub product_type: ProductType,
    /// CSS selector for candidate nodes
    pub item_selector: String,
    /// Must match the whole raw title; capture groups feed [`CaptureLayout`]
    pub title_pattern: String,
    /// Raw titles where this matches anywhere are rejected
    #[serde(default)]
    pub exclude_pattern: Option<String>,
    #[serde(default)]
    pub source: ItemSource,
    #[serde(default)]
    pub layout: CaptureLayout,
    /// Price nodes inside an item; direct `span` children when unset
    #[serde(default)]
    pub price_selector: Option<String>,
    /// Search text for providers with one page per product type
    #[serde(default)]
    pub query: Option<String>,
    /// First selected node labels the group instead of being an item
    #[serde(default)]
    pub group_header: bool,
}

/// Where an item's raw title comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemSource {
    /// Text of the node itself
    Inline {
        #[serde(default)]
        text: TitleText,
        /// Trailing characters dropped from the title (unit markers etc.)
        #[serde(default)]
        trim_suffix: usize,
    },
    /// A JSON object stored in an attribute of the node
    DataAttribute {
        attribute: String,
        name_field: String,
        price_field: String,
    },
}

impl Default for ItemSource {
    fn default() -> Self {
        ItemSource::Inline {
            text: TitleText::default(),
            trim_suffix: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleText {
    /// First text child only, so nested price spans are left out
    #[default]
    FirstTextNode,
    FullText,
}

/// Which capture group feeds which product field.
///
/// Indices are zero-based positions in the vector returned by
/// [`crate::patterns::group_extractor`], i.e. index 0 is the first group
/// declared in the title pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureLayout {
    /// Joined with a space; the whole raw title when empty
    #[serde(default)]
    pub title: Vec<usize>,
    /// Falls back to the group header label, then to an empty string
    #[serde(default)]
    pub description: Option<usize>,
    /// Falls back to the item's full text
    #[serde(default)]
    pub parameters: Option<usize>,
}

impl ProductTypeRule {
    pub fn new(
        product_type: ProductType,
        item_selector: impl Into<String>,
        title_pattern: impl Into<String>,
    ) -> Self {
        Self {
            product_type,
            item_selector: item_selector.into(),
            title_pattern: title_pattern.into(),
            exclude_pattern: None,
            source: ItemSource::default(),
            layout: CaptureLayout::default(),
            price_selector: None,
            query: None,
            group_header: false,
        }
    }

    pub fn excluding(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_pattern = Some(pattern.into());
        self
    }

    pub fn source(mut self, source: ItemSource) -> Self {
        self.source = source;
        self
    }

    pub fn layout(mut self, layout: CaptureLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn prices(mut self, selector: impl Into<String>) -> Self {
        self.price_selector = Some(selector.into());
        self
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_group_header(mut self) -> Self {
        self.group_header = true;
        self
    }
}

/// A rule with its selectors and patterns parsed
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub rule: ProductTypeRule,
    pub(crate) items: Selector,
    pub(crate) title: Regex,
    pub(crate) exclude: Option<Regex>,
    pub(crate) prices: Option<Selector>,
}

impl CompiledRule {
    pub fn compile(rule: ProductTypeRule) -> Result<Self, RuleError> {
        let product_type = rule.product_type;
        let selector = |s: &str| {
            Selector::parse(s).map_err(|e| RuleError::InvalidSelector {
                product_type,
                selector: s.to_string(),
                reason: e.to_string(),
            })
        };
        let pattern = |s: &str, anchor: bool| {
            let re = if anchor { anchored(s) } else { Regex::new(s) };
            re.map_err(|source| RuleError::InvalidPattern {
                product_type,
                source,
            })
        };

        let items = selector(&rule.item_selector)?;
        let prices = rule.price_selector.as_deref().map(selector).transpose()?;
        let title = pattern(&rule.title_pattern, true)?;
        let exclude = rule
            .exclude_pattern
            .as_deref()
            .map(|s| pattern(s, false))
            .transpose()?;

        // captures_len counts the implicit whole-match group
        let declared = title.captures_len() - 1;
        let fields = rule
            .layout
            .title
            .iter()
            .map(|&i| ("title", i))
            .chain(rule.layout.description.map(|i| ("description", i)))
            .chain(rule.layout.parameters.map(|i| ("parameters", i)));
        for (field, index) in fields {
            if index >= declared {
                return Err(RuleError::CaptureOutOfRange {
                    field,
                    index,
                    declared,
                    pattern: rule.title_pattern.clone(),
                });
            }
        }

        Ok(Self {
            rule,
            items,
            title,
            exclude,
            prices,
        })
    }

    pub fn product_type(&self) -> ProductType {
        self.rule.product_type
    }
}

/// Compiled rules of one provider, keyed by product type
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: IndexMap<ProductType, CompiledRule>,
}

impl RuleTable {
    pub fn new(rules: impl IntoIterator<Item = ProductTypeRule>) -> Result<Self, RuleError> {
        let mut table = IndexMap::new();
        for rule in rules {
            let product_type = rule.product_type;
            if table.contains_key(&product_type) {
                return Err(RuleError::Duplicate(product_type));
            }
            table.insert(product_type, CompiledRule::compile(rule)?);
        }
        Ok(Self { rules: table })
    }

    pub fn get(&self, product_type: ProductType) -> Option<&CompiledRule> {
        self.rules.get(&product_type)
    }

    pub fn contains(&self, product_type: ProductType) -> bool {
        self.rules.contains_key(&product_type)
    }

    pub fn product_types(&self) -> impl Iterator<Item = ProductType> + '_ {
        self.rules.keys().copied()
    }

    /// Rules for the requested types, in request order. Unknown and repeated
    /// types are dropped.
    pub fn resolve(&self, requested: &[ProductType]) -> Vec<&CompiledRule> {
        let mut seen = Vec::with_capacity(requested.len());
        requested
            .iter()
            .filter(|t| {
                if seen.contains(*t) {
                    return false;
                }
                seen.push(**t);
                true
            })
            .filter_map(|t| self.get(*t))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
