use std::ops::Deref;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::constants::LABEL_SEPARATOR;

/// One taxonomy-tagged entry of the source dataset.
///
/// Tag lists keep their source order for display; membership checks ignore it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub id: i64,
    #[serde(rename = "quote")]
    pub text: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub subcategories: Vec<String>,
}

impl Quote {
    pub fn new<C, S>(id: i64, text: impl Into<String>, categories: C, subcategories: S) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        Self {
            id,
            text: text.into(),
            categories: categories.into_iter().map(Into::into).collect(),
            subcategories: subcategories.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    pub fn has_subcategory(&self, subcategory: &str) -> bool {
        self.subcategories.iter().any(|s| s == subcategory)
    }

    pub fn categories_label(&self) -> String {
        self.categories.join(LABEL_SEPARATOR)
    }

    pub fn subcategories_label(&self) -> String {
        self.subcategories.join(LABEL_SEPARATOR)
    }
}

/// Immutable, cheaply clonable quote sequence in source order.
///
/// Serializes as the bare JSON array it was parsed from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuoteCollection(Arc<[Quote]>);

impl QuoteCollection {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse the static resource format: `[{id, quote, categories, subcategories}, ...]`.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Ids that occur more than once, each reported once, in first-repeat order.
    pub fn duplicate_ids(&self) -> Vec<i64> {
        let mut seen = std::collections::HashSet::new();
        let mut dupes = Vec::new();
        for quote in self.0.iter() {
            if !seen.insert(quote.id) && !dupes.contains(&quote.id) {
                dupes.push(quote.id);
            }
        }
        dupes
    }
}

impl Deref for QuoteCollection {
    type Target = [Quote];

    fn deref(&self) -> &[Quote] {
        &self.0
    }
}

impl From<Vec<Quote>> for QuoteCollection {
    fn from(quotes: Vec<Quote>) -> Self {
        Self(quotes.into())
    }
}

impl FromIterator<Quote> for QuoteCollection {
    fn from_iter<I: IntoIterator<Item = Quote>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
