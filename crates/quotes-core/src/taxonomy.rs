//! Category and subcategory derivation.
//!
//! There is no explicit category → subcategory mapping in the data. A
//! subcategory belongs under a category only because both tags co-occur on
//! the same quote, so the subcategory set is always computed against the
//! currently selected category.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::quote::Quote;

/// What the subcategory selector offers while no category is selected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubcategoryPolicy {
    /// No category selected yields no subcategories. Matches the behavior of
    /// testing each quote's category list for the empty "All" sentinel.
    #[default]
    Strict,
    /// No category selected yields every subcategory in the collection.
    Union,
}

impl SubcategoryPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubcategoryPolicy::Strict => "strict",
            SubcategoryPolicy::Union => "union",
        }
    }
}

impl fmt::Display for SubcategoryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubcategoryPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Ok(SubcategoryPolicy::Strict),
            "union" => Ok(SubcategoryPolicy::Union),
            other => Err(format!(
                "subcategory policy must be 'strict' or 'union', got '{other}'"
            )),
        }
    }
}

/// Deduplicate strings, keeping the first occurrence of each.
pub fn distinct<'a, I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::new();
    for value in values {
        if seen.insert(value.as_str()) {
            out.push(value.clone());
        }
    }
    out
}

/// Every distinct category across the collection, in first-seen order.
pub fn derive_categories(quotes: &[Quote]) -> Vec<String> {
    distinct(quotes.iter().flat_map(|q| q.categories.iter()))
}

/// Distinct subcategories of quotes tagged with `category`, in first-seen order.
///
/// `None` means no category is selected; `policy` decides the result then.
pub fn derive_subcategories(
    quotes: &[Quote],
    category: Option<&str>,
    policy: SubcategoryPolicy,
) -> Vec<String> {
    match (category, policy) {
        (Some(category), _) => distinct(
            quotes
                .iter()
                .filter(|q| q.has_category(category))
                .flat_map(|q| q.subcategories.iter()),
        ),
        (None, SubcategoryPolicy::Strict) => Vec::new(),
        (None, SubcategoryPolicy::Union) => {
            distinct(quotes.iter().flat_map(|q| q.subcategories.iter()))
        }
    }
}
