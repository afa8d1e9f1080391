use std::collections::{BTreeMap, HashMap};

use polars::prelude::*;
use tracing::{debug, warn};

use crate::error::LoadError;
use crate::inventory::{Category, ClosetItem};
use crate::schema::worn;
use crate::wear_log::WearEvent;

/// One closet item joined with its wear count.
#[derive(Debug, Clone, PartialEq)]
pub struct WornMetrics {
    pub item: ClosetItem,
    pub name: String,
    pub wear_count: u32,
}

impl WornMetrics {
    /// `round(price / wear_count, 2)`; `None` unless worn and priced above zero.
    pub fn cost_per_wear(&self) -> Option<f64> {
        match self.item.price {
            Some(price) if price > 0.0 && self.wear_count > 0 => {
                Some(round2(price / f64::from(self.wear_count)))
            }
            _ => None,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, PartialEq)]
pub struct CostPerWearRow {
    pub id: u32,
    pub name: String,
    pub category: Option<Category>,
    pub price: f64,
    pub wear_count: u32,
    pub cost_per_wear: f64,
}

impl CostPerWearRow {
    pub fn label(&self) -> String {
        format!("${:.2}", self.cost_per_wear)
    }
}

/// Canonical join result: exactly one row per inventory item, in inventory
/// order.
#[derive(Debug, Clone, Default)]
pub struct WornTable {
    rows: Vec<WornMetrics>,
    /// Wear events whose id matched no inventory item.
    pub orphaned_events: usize,
}

/// Items of one category, in inventory order.
#[derive(Debug, Clone)]
pub struct CategoryGroups<'a> {
    groups: BTreeMap<Category, Vec<&'a WornMetrics>>,
}

impl<'a> CategoryGroups<'a> {
    pub fn get(&self, category: Category) -> &[&'a WornMetrics] {
        self.groups
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every category of the closed set, including empty ones.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[&'a WornMetrics])> + '_ {
        Category::ALL.into_iter().map(move |c| (c, self.get(c)))
    }
}

/// Count wear events per item id.
fn wear_counts(events: &[WearEvent]) -> Result<HashMap<u32, u32>, LoadError> {
    if events.is_empty() {
        return Ok(HashMap::new());
    }
    let ids: Vec<i64> = events.iter().map(|e| i64::from(e.item_id)).collect();
    let df = DataFrame::new(vec![Column::new(worn::ID.into(), ids)])?;

    let counts = df
        .lazy()
        .group_by([col(worn::ID)])
        .agg([len().cast(DataType::Int64).alias(worn::WEAR_COUNT)])
        .collect()?;

    let ids = counts.column(worn::ID)?.i64()?;
    let totals = counts.column(worn::WEAR_COUNT)?.i64()?;

    let mut out = HashMap::with_capacity(counts.height());
    for (id, total) in ids.into_iter().zip(totals) {
        if let (Some(id), Some(total)) = (id, total) {
            let id = u32::try_from(id)
                .map_err(|_| LoadError::InvalidData(format!("item id {id} out of range")))?;
            let total = u32::try_from(total)
                .map_err(|_| LoadError::InvalidData(format!("wear count {total} out of range")))?;
            out.insert(id, total);
        }
    }
    Ok(out)
}

/// Left-join the inventory with per-item wear counts. Items never worn get
/// a count of 0; events referencing unknown ids are counted as orphaned.
pub fn aggregate(inventory: &[ClosetItem], events: &[WearEvent]) -> Result<WornTable, LoadError> {
    let mut counts = wear_counts(events)?;

    let rows: Vec<WornMetrics> = inventory
        .iter()
        .map(|item| WornMetrics {
            name: item.name(),
            wear_count: counts.remove(&item.id).unwrap_or(0),
            item: item.clone(),
        })
        .collect();

    let orphaned_events: usize = counts.values().map(|&c| c as usize).sum();
    if orphaned_events > 0 {
        let mut ids: Vec<u32> = counts.keys().copied().collect();
        ids.sort_unstable();
        warn!(orphaned_events, ?ids, "wear events reference unknown items");
    }
    debug!(rows = rows.len(), "aggregated wear counts");

    Ok(WornTable {
        rows,
        orphaned_events,
    })
}

impl WornTable {
    pub fn rows(&self) -> &[WornMetrics] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&WornMetrics> {
        // ids are row positions
        self.rows
            .get(id as usize)
            .filter(|r| r.item.id == id)
            .or_else(|| self.rows.iter().find(|r| r.item.id == id))
    }

    pub fn total_wears(&self) -> u64 {
        self.rows.iter().map(|r| u64::from(r.wear_count)).sum()
    }

    /// Most worn first; ties keep inventory order.
    pub fn top_k(&self, k: usize) -> Vec<&WornMetrics> {
        let mut ranked: Vec<&WornMetrics> = self.rows.iter().collect();
        ranked.sort_by(|a, b| b.wear_count.cmp(&a.wear_count));
        ranked.truncate(k);
        ranked
    }

    /// Least worn first among items worn at least once; ties keep inventory
    /// order. Never-worn items are reported by [`WornTable::never_worn`].
    pub fn bottom_k(&self, k: usize) -> Vec<&WornMetrics> {
        let mut ranked: Vec<&WornMetrics> =
            self.rows.iter().filter(|r| r.wear_count > 0).collect();
        ranked.sort_by(|a, b| a.wear_count.cmp(&b.wear_count));
        ranked.truncate(k);
        ranked
    }

    pub fn never_worn(&self) -> Vec<&WornMetrics> {
        self.rows.iter().filter(|r| r.wear_count == 0).collect()
    }

    /// `(id, name)` of the top-k items, the choices offered by the heatmap selector.
    pub fn heatmap_choices(&self, k: usize) -> Vec<(u32, String)> {
        self.top_k(k)
            .into_iter()
            .map(|r| (r.item.id, r.name.clone()))
            .collect()
    }

    pub fn cost_per_wear_rows(&self) -> Vec<CostPerWearRow> {
        self.rows
            .iter()
            .filter_map(|r| {
                let cost_per_wear = r.cost_per_wear()?;
                Some(CostPerWearRow {
                    id: r.item.id,
                    name: r.name.clone(),
                    category: r.item.category,
                    price: r.item.price?,
                    wear_count: r.wear_count,
                    cost_per_wear,
                })
            })
            .collect()
    }

    /// Uncategorised items belong to no group.
    pub fn category_groups(&self) -> CategoryGroups<'_> {
        let mut groups: BTreeMap<Category, Vec<&WornMetrics>> = BTreeMap::new();
        for row in &self.rows {
            if let Some(category) = row.item.category {
                groups.entry(category).or_default().push(row);
            }
        }
        CategoryGroups { groups }
    }

    /// Most worn k items of every category (facet view).
    pub fn top_k_per_category(&self, k: usize) -> Vec<(Category, Vec<&WornMetrics>)> {
        self.category_groups()
            .iter()
            .map(|(category, rows)| {
                let mut ranked = rows.to_vec();
                ranked.sort_by(|a, b| b.wear_count.cmp(&a.wear_count));
                ranked.truncate(k);
                (category, ranked)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn item(id: u32, brand: &str, label: &str, category: Category, price: Option<f64>) -> ClosetItem {
        ClosetItem {
            id,
            item_label: label.to_string(),
            brand: brand.to_string(),
            category: Some(category),
            sub_category: None,
            color_text: Some("Black".to_string()),
            pattern: None,
            bought_via: Some("New".to_string()),
            price,
            cost: price,
            added_current_year: false,
            primary_color_prefix: "Black".to_string(),
            display_name: format!("{id} {brand} {label} - Black"),
        }
    }

    fn wear(id: u32, day: u32) -> WearEvent {
        WearEvent {
            date: NaiveDate::from_ymd_opt(2023, 1, day).unwrap(),
            slot: "Top".to_string(),
            item_ref_raw: format!("{id} Thing"),
            item_id: id,
        }
    }

    fn closet(n: u32) -> Vec<ClosetItem> {
        (0..n)
            .map(|i| item(i, "Brand", &format!("Item{i}"), Category::Top, Some(10.0)))
            .collect()
    }

    #[test]
    fn hoodie_worn_three_times() {
        let inventory = vec![item(0, "Nike", "Hoodie", Category::Top, Some(40.0))];
        let events = vec![wear(0, 1), wear(0, 2), wear(0, 3)];
        let table = aggregate(&inventory, &events).unwrap();

        let row = &table.rows()[0];
        assert_eq!(row.wear_count, 3);
        assert_eq!(row.name, "Nike Hoodie");
        assert_eq!(row.cost_per_wear(), Some(13.33));
        assert_eq!(table.cost_per_wear_rows()[0].label(), "$13.33");
    }

    #[test]
    fn unworn_items_are_kept_with_zero() {
        let events = vec![wear(0, 1), wear(2, 1), wear(2, 2)];
        let table = aggregate(&closet(5), &events).unwrap();

        assert_eq!(table.len(), 5);
        let counts: Vec<u32> = table.rows().iter().map(|r| r.wear_count).collect();
        assert_eq!(counts, vec![1, 0, 2, 0, 0]);
        assert_eq!(table.never_worn().len(), 3);
    }

    #[test]
    fn orphaned_events_are_counted_not_joined() {
        let events = vec![wear(0, 1), wear(9, 1), wear(9, 2)];
        let table = aggregate(&closet(2), &events).unwrap();
        assert_eq!(table.orphaned_events, 2);
        assert_eq!(table.total_wears(), 1);
    }

    #[test]
    fn empty_inventory_gives_empty_table() {
        let table = aggregate(&[], &[wear(0, 1)]).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.orphaned_events, 1);
    }

    #[test]
    fn cost_per_wear_skips_unworn_and_unpriced() {
        let inventory = vec![
            item(0, "A", "Free", Category::Top, Some(0.0)),
            item(1, "B", "Unpriced", Category::Top, None),
            item(2, "C", "Unworn", Category::Top, Some(30.0)),
            item(3, "D", "Worn", Category::Top, Some(30.0)),
        ];
        let events = vec![wear(0, 1), wear(1, 1), wear(3, 1), wear(3, 2)];
        let table = aggregate(&inventory, &events).unwrap();
        let cpw = table.cost_per_wear_rows();
        assert_eq!(cpw.len(), 1);
        assert_eq!(cpw[0].id, 3);
        assert_eq!(cpw[0].cost_per_wear, 15.0);
        assert_eq!(cpw[0].label(), "$15.00");
        // base table still has every item
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn rankings_break_ties_by_inventory_order() {
        let events = vec![
            wear(1, 1),
            wear(1, 2),
            wear(3, 1),
            wear(3, 2),
            wear(0, 1),
            wear(4, 1),
        ];
        let table = aggregate(&closet(5), &events).unwrap();

        let top: Vec<u32> = table.top_k(3).iter().map(|r| r.item.id).collect();
        assert_eq!(top, vec![1, 3, 0]);

        let bottom: Vec<u32> = table.bottom_k(3).iter().map(|r| r.item.id).collect();
        assert_eq!(bottom, vec![0, 4, 1]);

        let never: Vec<u32> = table.never_worn().iter().map(|r| r.item.id).collect();
        assert_eq!(never, vec![2]);

        let choices = table.heatmap_choices(1);
        assert_eq!(choices, vec![(1, "Brand Item1".to_string())]);
    }

    #[test]
    fn category_groups_cover_the_closed_set() {
        let inventory = vec![
            item(0, "A", "Tee", Category::Top, None),
            item(1, "B", "Boot", Category::Shoes, None),
            item(2, "C", "Tank", Category::Top, None),
        ];
        let events = vec![wear(2, 1), wear(2, 2), wear(0, 1)];
        let table = aggregate(&inventory, &events).unwrap();
        let groups = table.category_groups();

        let tops: Vec<u32> = groups.get(Category::Top).iter().map(|r| r.item.id).collect();
        assert_eq!(tops, vec![0, 2]);
        assert!(groups.get(Category::FullBody).is_empty());
        assert_eq!(groups.iter().count(), 6);

        let facets = table.top_k_per_category(1);
        assert_eq!(facets[0].0, Category::Top);
        assert_eq!(facets[0].1[0].item.id, 2);
        assert_eq!(facets[5].0, Category::Shoes);
    }

    #[test]
    fn uncategorised_items_are_counted_but_ungrouped() {
        let mut loose = item(1, "B", "Belt", Category::Accessory, Some(12.0));
        loose.category = None;
        let inventory = vec![item(0, "A", "Tee", Category::Top, None), loose];
        let events = vec![wear(1, 1), wear(1, 2), wear(0, 1)];
        let table = aggregate(&inventory, &events).unwrap();

        assert_eq!(table.get(1).map(|r| r.wear_count), Some(2));
        assert_eq!(table.top_k(1)[0].item.id, 1);
        let grouped: usize = table.category_groups().iter().map(|(_, rows)| rows.len()).sum();
        assert_eq!(grouped, 1);
        assert_eq!(table.cost_per_wear_rows()[0].category, None);
    }

    #[test]
    fn lookup_by_id() {
        let table = aggregate(&closet(3), &[]).unwrap();
        assert_eq!(table.get(2).map(|r| r.item.id), Some(2));
        assert!(table.get(7).is_none());
    }
}
