//! The filtered view over a quote collection.
//!
//! `QuoteView` is the single state record behind every front end: the loaded
//! collection, its category list (derived once per load), the current
//! selection and the subcategory policy. Transitions return a new record;
//! subcategory options are recomputed on read so they can never go stale.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::constants::{ALL_CATEGORIES_LABEL, ALL_SENTINEL, ALL_SUBCATEGORIES_LABEL};
use crate::quote::{Quote, QuoteCollection};
use crate::selection::Selection;
use crate::taxonomy::{SubcategoryPolicy, derive_categories, derive_subcategories};

/// One entry of a selector control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// Display form of one visible quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: i64,
    pub text: String,
    pub categories: String,
    pub subcategories: String,
}

impl From<&Quote> for Card {
    fn from(quote: &Quote) -> Self {
        Self {
            id: quote.id,
            text: quote.text.clone(),
            categories: quote.categories_label(),
            subcategories: quote.subcategories_label(),
        }
    }
}

/// Serializable picture of everything a front end renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewSnapshot {
    pub selection: Selection,
    pub policy: SubcategoryPolicy,
    pub categories: Vec<SelectorOption>,
    pub subcategories: Vec<SelectorOption>,
    pub cards: Vec<Card>,
    pub total: usize,
    pub visible: usize,
}

/// Category predicate AND subcategory predicate; an unset field matches all.
pub fn is_visible(quote: &Quote, selection: &Selection) -> bool {
    selection.category().is_none_or(|c| quote.has_category(c))
        && selection.subcategory().is_none_or(|s| quote.has_subcategory(s))
}

fn options(sentinel_label: &str, values: &[String], selected: Option<&str>) -> Vec<SelectorOption> {
    let mut out = Vec::with_capacity(values.len() + 1);
    out.push(SelectorOption {
        value: ALL_SENTINEL.to_string(),
        label: sentinel_label.to_string(),
        selected: selected.is_none(),
    });
    out.extend(values.iter().map(|v| SelectorOption {
        value: v.clone(),
        label: v.clone(),
        selected: selected == Some(v.as_str()),
    }));
    // A selection outside the derived values still filters, so it stays listed.
    if let Some(s) = selected
        && !values.iter().any(|v| v == s)
    {
        out.push(SelectorOption {
            value: s.to_string(),
            label: s.to_string(),
            selected: true,
        });
    }
    out
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteView {
    quotes: QuoteCollection,
    categories: Arc<[String]>,
    selection: Selection,
    policy: SubcategoryPolicy,
}

impl QuoteView {
    pub fn new(quotes: QuoteCollection, policy: SubcategoryPolicy) -> Self {
        let categories = derive_categories(&quotes).into();
        Self {
            quotes,
            categories,
            selection: Selection::new(),
            policy,
        }
    }

    /// View over nothing: what renders before a load completes or after it fails.
    pub fn empty(policy: SubcategoryPolicy) -> Self {
        Self::new(QuoteCollection::empty(), policy)
    }

    /// Swap in a freshly loaded collection, keeping the selection.
    #[must_use]
    pub fn with_collection(&self, quotes: QuoteCollection) -> Self {
        Self {
            selection: self.selection.clone(),
            ..Self::new(quotes, self.policy)
        }
    }

    #[must_use]
    pub fn with_selection(&self, selection: Selection) -> Self {
        Self {
            selection,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_policy(&self, policy: SubcategoryPolicy) -> Self {
        Self {
            policy,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn select_category(&self, category: Option<&str>) -> Self {
        self.with_selection(self.selection.select_category(category))
    }

    #[must_use]
    pub fn select_subcategory(&self, subcategory: Option<&str>) -> Self {
        self.with_selection(self.selection.select_subcategory(subcategory))
    }

    pub fn quotes(&self) -> &QuoteCollection {
        &self.quotes
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn policy(&self) -> SubcategoryPolicy {
        self.policy
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn subcategories(&self) -> Vec<String> {
        derive_subcategories(&self.quotes, self.selection.category(), self.policy)
    }

    pub fn visible(&self) -> impl Iterator<Item = &Quote> + '_ {
        self.quotes
            .iter()
            .filter(move |q| is_visible(q, &self.selection))
    }

    pub fn category_options(&self) -> Vec<SelectorOption> {
        options(ALL_CATEGORIES_LABEL, &self.categories, self.selection.category())
    }

    pub fn subcategory_options(&self) -> Vec<SelectorOption> {
        options(
            ALL_SUBCATEGORIES_LABEL,
            &self.subcategories(),
            self.selection.subcategory(),
        )
    }

    pub fn cards(&self) -> Vec<Card> {
        self.visible().map(Card::from).collect()
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        let cards = self.cards();
        ViewSnapshot {
            selection: self.selection.clone(),
            policy: self.policy,
            categories: self.category_options(),
            subcategories: self.subcategory_options(),
            total: self.quotes.len(),
            visible: cards.len(),
            cards,
        }
    }
}
