/// Column-name constants for wear-tracekit tables.
/// Input defaults mirror the closet spreadsheet; output names are what the
/// chart layer reads. Exported to Python via PyO3.

// ── Inventory input columns (defaults, overridable in config) ───────────────
pub mod inventory {
    pub const ITEM: &str = "Item";
    pub const BRAND: &str = "Brand";
    pub const CATEGORY: &str = "Category";
    pub const SUB_CATEGORY: &str = "Sub-Category";
    pub const COLOR: &str = "Color";
    pub const PATTERN: &str = "Pattern";
    pub const BOUGHT: &str = "Bought";
    pub const PRICE: &str = "Price";
    pub const COST: &str = "Cost";
    pub const ADDED_CURRENT_YEAR: &str = "2023";

    /// Colour cell value marking a row pending removal.
    pub const PLACEHOLDER_COLOR: &str = "Delete";
}

// ── Wear log input columns ──────────────────────────────────────────────────
pub mod wear_log {
    pub const DATE: &str = "Date";
    pub const TIMESTAMP: &str = "Timestamp";
}

// ── WornMetrics output columns ──────────────────────────────────────────────
pub mod worn {
    pub const ID: &str = "id";
    pub const NAME: &str = "name";
    pub const DISPLAY_NAME: &str = "display_name";
    pub const ITEM_LABEL: &str = "item_label";
    pub const CATEGORY: &str = "category";
    pub const SUB_CATEGORY: &str = "sub_category";
    pub const COLOR_TEXT: &str = "color_text";
    pub const PATTERN: &str = "pattern";
    pub const BRAND: &str = "brand";
    pub const BOUGHT_VIA: &str = "bought_via";
    pub const PRICE: &str = "price";
    pub const COST: &str = "cost";
    pub const ADDED_CURRENT_YEAR: &str = "added_current_year";
    pub const WEAR_COUNT: &str = "wear_count";
}

// ── Cost-per-wear output columns ────────────────────────────────────────────
pub mod cost_per_wear {
    pub const COST_PER_WEAR: &str = "cost_per_wear";
    pub const COST_PER_WEAR_LABEL: &str = "cost_per_wear_label";
}

// ── Calendar presence output columns ────────────────────────────────────────
pub mod calendar {
    pub const DATE: &str = "date";
    pub const DAY_OF_WEEK: &str = "day_of_week";
    pub const ISO_WEEK: &str = "iso_week";
    pub const WEEK_BUCKET: &str = "week_bucket";
    pub const PRESENT: &str = "present";
}

// ── Flag values ─────────────────────────────────────────────────────────────
pub mod flag {
    pub const YES: &str = "Yes";
    pub const NO: &str = "No";
}
