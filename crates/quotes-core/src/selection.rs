//! Selection state machine.
//!
//! States are `{category: none|C, subcategory: none|S}`, starting at
//! `{none, none}`. Choosing a category always clears the subcategory; there
//! is no terminal state.

use serde::{Deserialize, Serialize};

use crate::constants::ALL_SENTINEL;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    pub category: Option<String>,
    pub subcategory: Option<String>,
}

/// The "All" sentinel (and any absent value) maps to no selection.
fn normalize(value: Option<&str>) -> Option<String> {
    value
        .filter(|v| *v != ALL_SENTINEL)
        .map(str::to_string)
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// `selectCategory(c)` → `{category: c, subcategory: none}`.
    #[must_use]
    pub fn select_category(&self, category: Option<&str>) -> Self {
        Self {
            category: normalize(category),
            subcategory: None,
        }
    }

    /// `selectSubcategory(s)` → `{category: unchanged, subcategory: s}`.
    #[must_use]
    pub fn select_subcategory(&self, subcategory: Option<&str>) -> Self {
        Self {
            category: self.category.clone(),
            subcategory: normalize(subcategory),
        }
    }

    /// Rebuild a selection from form parameters.
    ///
    /// `previous_category` is the category the form was rendered with. When
    /// the submitted category differs from it the user changed the category
    /// selector, so the submitted subcategory is stale and gets dropped.
    /// Without a previous category both values are applied as given.
    pub fn from_params(
        category: Option<&str>,
        subcategory: Option<&str>,
        previous_category: Option<&str>,
    ) -> Self {
        let previous = match previous_category {
            Some(prev) => normalize(Some(prev)),
            None => normalize(category),
        };
        let restored = Self::new()
            .select_category(previous.as_deref())
            .select_subcategory(subcategory);
        let submitted = normalize(category);
        if submitted != restored.category {
            restored.select_category(submitted.as_deref())
        } else {
            restored
        }
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn subcategory(&self) -> Option<&str> {
        self.subcategory.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.subcategory.is_none()
    }
}
