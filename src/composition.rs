use std::collections::BTreeMap;
use std::fmt;

use crate::inventory::{Category, ClosetItem};
use crate::schema::inventory::PLACEHOLDER_COLOR;

/// First comma-separated colour, trimmed.
pub fn primary_color(item: &ClosetItem) -> Option<&str> {
    item.color_text
        .as_deref()
        .and_then(|c| c.split(',').next())
        .map(str::trim)
        .filter(|c| !c.is_empty())
}

/// Items per primary colour, sorted by colour name. Rows still carrying
/// the placeholder colour are left out.
pub fn color_composition<'a>(items: impl IntoIterator<Item = &'a ClosetItem>) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for item in items {
        if let Some(color) = primary_color(item).filter(|c| *c != PLACEHOLDER_COLOR) {
            *counts.entry(color.to_string()).or_default() += 1;
        }
    }
    counts.into_iter().collect()
}

/// Items per category, in closed-set order, zero counts included.
/// Uncategorised items are not counted.
pub fn category_composition<'a>(
    items: impl IntoIterator<Item = &'a ClosetItem>,
) -> Vec<(Category, usize)> {
    let mut counts: BTreeMap<Category, usize> = Category::ALL.iter().map(|&c| (c, 0)).collect();
    for category in items.into_iter().filter_map(|i| i.category) {
        *counts.entry(category).or_default() += 1;
    }
    counts.into_iter().collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PurchaseKind {
    New,
    Secondhand,
}

impl PurchaseKind {
    pub fn of_label(label: &str) -> Self {
        if label == "New" {
            PurchaseKind::New
        } else {
            PurchaseKind::Secondhand
        }
    }
}

impl fmt::Display for PurchaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PurchaseKind::New => f.write_str("New"),
            PurchaseKind::Secondhand => f.write_str("Secondhand"),
        }
    }
}

/// Short purchase-channel label: "Secondhand, Thrifted" and
/// "Secondhand/Thrifted" become "Thrifted", Depop becomes "Vintage",
/// Gifted becomes "Gifted". Anything else is returned unchanged.
pub fn bought_label(raw: &str) -> String {
    let raw = raw.trim();
    let channel = raw
        .strip_prefix("Secondhand")
        .map(|rest| rest.trim_start_matches([',', '/', ' ']).trim());
    match channel {
        Some("Thrifted") => "Thrifted".to_string(),
        Some("Depop") => "Vintage".to_string(),
        Some("Gifted") => "Gifted".to_string(),
        _ => raw.to_string(),
    }
}

/// Items per (new/secondhand, channel label). Items without a purchase
/// channel are skipped.
pub fn bought_breakdown<'a>(
    items: impl IntoIterator<Item = &'a ClosetItem>,
) -> BTreeMap<(PurchaseKind, String), usize> {
    let mut counts = BTreeMap::new();
    for raw in items.into_iter().filter_map(|i| i.bought_via.as_deref()) {
        let label = bought_label(raw);
        *counts
            .entry((PurchaseKind::of_label(&label), label))
            .or_default() += 1;
    }
    counts
}

/// Items flagged as added in the current year.
pub fn new_items<'a>(items: impl IntoIterator<Item = &'a ClosetItem>) -> Vec<&'a ClosetItem> {
    items
        .into_iter()
        .filter(|i| i.added_current_year)
        .collect()
}
