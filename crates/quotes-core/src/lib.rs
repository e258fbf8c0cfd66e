//! Quote taxonomy engine.
//!
//! Models a static, read-only collection of quotes tagged with categories and
//! subcategories. Derives the two-level taxonomy from the data itself
//! (subcategories only exist relative to co-occurring categories) and filters
//! the collection through a two-field selection state machine.
//!
//! Zero I/O — pure data transformation with no opinions about where quotes
//! come from or how views are rendered.

pub mod constants;
pub mod quote;
pub mod selection;
pub mod taxonomy;
pub mod view;

pub use constants::{ALL_CATEGORIES_LABEL, ALL_SENTINEL, ALL_SUBCATEGORIES_LABEL, LABEL_SEPARATOR};
pub use quote::{Quote, QuoteCollection};
pub use selection::Selection;
pub use taxonomy::{SubcategoryPolicy, derive_categories, derive_subcategories, distinct};
pub use view::{Card, QuoteView, SelectorOption, ViewSnapshot, is_visible};
