/// Selector value meaning "no selection" on every wire and UI surface.
pub const ALL_SENTINEL: &str = "";

/// Label of the sentinel option in the category selector.
pub const ALL_CATEGORIES_LABEL: &str = "All Categories";

/// Label of the sentinel option in the subcategory selector.
pub const ALL_SUBCATEGORIES_LABEL: &str = "All Subcategories";

/// Separator used when joining a quote's tags for display.
pub const LABEL_SEPARATOR: &str = ", ";
