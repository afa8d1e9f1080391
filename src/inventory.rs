use std::fmt;

use polars::prelude::*;
use tracing::{info, warn};

use crate::config::TrackerConfig;
use crate::error::LoadError;
use crate::schema::flag;
use crate::source;

/// Closed set of garment categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Top,
    Bottom,
    FullBody,
    Outerwear,
    Accessory,
    Shoes,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Top,
        Category::Bottom,
        Category::FullBody,
        Category::Outerwear,
        Category::Accessory,
        Category::Shoes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Top => "Top",
            Category::Bottom => "Bottom",
            Category::FullBody => "Full Body",
            Category::Outerwear => "Outerwear",
            Category::Accessory => "Accessory",
            Category::Shoes => "Shoes",
        }
    }

    /// Case-insensitive; plural spellings are accepted.
    pub fn parse(raw: &str) -> Option<Self> {
        let key: String = raw
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();
        match key.as_str() {
            "top" | "tops" => Some(Category::Top),
            "bottom" | "bottoms" => Some(Category::Bottom),
            "fullbody" => Some(Category::FullBody),
            "outerwear" => Some(Category::Outerwear),
            "accessory" | "accessories" => Some(Category::Accessory),
            "shoe" | "shoes" => Some(Category::Shoes),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One physical garment. `id` is the zero-based row position in the
/// inventory source, so it is only stable while that file keeps its row
/// order; the wear log refers to items by these exact integers.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosetItem {
    pub id: u32,
    pub item_label: String,
    pub brand: String,
    /// `None` when the source cell is blank or outside the known set.
    pub category: Option<Category>,
    pub sub_category: Option<String>,
    pub color_text: Option<String>,
    pub pattern: Option<String>,
    pub bought_via: Option<String>,
    pub price: Option<f64>,
    pub cost: Option<f64>,
    pub added_current_year: bool,
    pub primary_color_prefix: String,
    pub display_name: String,
}

impl ClosetItem {
    /// `"{brand} {item_label}"`, the label most charts use.
    pub fn name(&self) -> String {
        format!("{} {}", self.brand, self.item_label)
    }

    pub fn category_label(&self) -> Option<&'static str> {
        self.category.as_ref().map(Category::as_str)
    }

    pub fn added_flag(&self) -> &'static str {
        if self.added_current_year {
            flag::YES
        } else {
            flag::NO
        }
    }
}

/// Capitalise the first letter of every word and lowercase the rest.
/// A word starts after any non-alphabetic character ("t-shirt" -> "T-Shirt").
pub fn title_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut prev_alpha = false;
    for c in raw.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

/// First `len` characters of the raw colour text. Not delimiter aware:
/// "Burgundy, White" gives "Burgu".
pub fn primary_color_prefix(color_text: Option<&str>, len: usize) -> String {
    color_text
        .map(|c| c.chars().take(len).collect())
        .unwrap_or_default()
}

pub fn display_name(id: u32, brand: &str, item_label: &str, color_prefix: &str) -> String {
    format!("{id} {brand} {item_label} - {color_prefix}")
}

/// Anything but a literal "Yes" (surrounding whitespace ignored) is "No".
pub fn normalize_added_flag(raw: Option<&str>) -> bool {
    raw.map(str::trim) == Some(flag::YES)
}

/// Read the inventory CSV named by the config.
pub fn load_inventory_csv(config: &TrackerConfig) -> Result<Vec<ClosetItem>, LoadError> {
    let df = source::read_csv(&config.inventory_path())?;
    load_inventory(&df, config)
}

/// Build closet items from an inventory table, preserving row order.
/// Rows with an unrecognised category are kept uncategorised so ids stay
/// equal to row positions.
pub fn load_inventory(df: &DataFrame, config: &TrackerConfig) -> Result<Vec<ClosetItem>, LoadError> {
    let cols = &config.inventory;
    source::require_columns(df, &cols.required())?;

    let text_cols = [
        cols.item.as_str(),
        cols.brand.as_str(),
        cols.category.as_str(),
        cols.sub_category.as_str(),
        cols.color.as_str(),
        cols.pattern.as_str(),
        cols.bought.as_str(),
        cols.added_current_year.as_str(),
    ];
    let df = source::columns_as_strings(df, &text_cols)?;
    let df = source::parse_float_columns(df, &[cols.price.as_str(), cols.cost.as_str()])?;

    let items = df.column(&cols.item)?.str()?;
    let brands = df.column(&cols.brand)?.str()?;
    let categories = df.column(&cols.category)?.str()?;
    let sub_categories = df.column(&cols.sub_category)?.str()?;
    let colors = df.column(&cols.color)?.str()?;
    let patterns = df.column(&cols.pattern)?.str()?;
    let bought = df.column(&cols.bought)?.str()?;
    let added = df.column(&cols.added_current_year)?.str()?;
    let prices = df.column(&cols.price)?.f64()?;
    let costs = df.column(&cols.cost)?.f64()?;

    let mut closet = Vec::with_capacity(df.height());
    let mut uncategorized = 0usize;
    for i in 0..df.height() {
        let id = u32::try_from(i)
            .map_err(|_| LoadError::InvalidData(format!("inventory row {i} exceeds id range")))?;

        let raw_category = categories.get(i).unwrap_or("");
        let category = Category::parse(raw_category);
        if category.is_none() {
            uncategorized += 1;
            warn!(row = i, category = raw_category, column = %cols.category, "unknown category, item left uncategorised");
        }

        let item_label = title_case(items.get(i).unwrap_or("").trim());
        let brand = title_case(brands.get(i).unwrap_or("").trim());
        let color_text = colors.get(i).map(str::to_string);
        let color_prefix = primary_color_prefix(color_text.as_deref(), config.color_prefix_len);

        closet.push(ClosetItem {
            id,
            display_name: display_name(id, &brand, &item_label, &color_prefix),
            item_label,
            brand,
            category,
            sub_category: sub_categories.get(i).map(str::to_string),
            color_text,
            pattern: patterns.get(i).map(str::to_string),
            bought_via: bought.get(i).map(str::to_string),
            price: prices.get(i),
            cost: costs.get(i),
            added_current_year: normalize_added_flag(added.get(i)),
            primary_color_prefix: color_prefix,
        });
    }

    info!(items = closet.len(), uncategorized, "inventory loaded");
    Ok(closet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::frame_from_csv_bytes;

    const HEADER: &str = "Item,Category,Sub-Category,Color,Pattern,Brand,Bought,Price,Cost,2023\n";

    fn load(rows: &str) -> Result<Vec<ClosetItem>, LoadError> {
        let df = frame_from_csv_bytes(format!("{HEADER}{rows}").into_bytes()).unwrap();
        load_inventory(&df, &TrackerConfig::default())
    }

    #[test]
    fn title_case_handles_caps_and_mixed_input() {
        assert_eq!(title_case("HOODIE"), "Hoodie");
        assert_eq!(title_case("hOoDiE"), "Hoodie");
        assert_eq!(title_case("tennis shoe"), "Tennis Shoe");
        assert_eq!(title_case("t-shirt"), "T-Shirt");
        assert_eq!(title_case("LEVI'S 501"), "Levi'S 501");
    }

    #[test]
    fn ids_follow_row_order() {
        let closet = load(
            "hoodie,Top,Sweater,Black,Solid,NIKE,New,40,40,Yes\n\
             jeans,Bottom,Denim,Blue,Solid,levis,\"Secondhand, Thrifted\",20,8,\n\
             boots,Shoes,Boot,Brown,Solid,Blundstone,New,250,250,No\n",
        )
        .unwrap();
        let ids: Vec<u32> = closet.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(closet[1].brand, "Levis");
        assert_eq!(closet[1].bought_via.as_deref(), Some("Secondhand, Thrifted"));
        assert_eq!(closet[2].category, Some(Category::Shoes));
    }

    #[test]
    fn display_name_uses_truncated_primary_color() {
        let closet = load("hoodie,Top,Sweater,\"Burgundy, White\",Solid,nike,New,40,40,Yes\n").unwrap();
        assert_eq!(closet[0].primary_color_prefix, "Burgu");
        assert_eq!(closet[0].display_name, "0 Nike Hoodie - Burgu");
        assert_eq!(closet[0].name(), "Nike Hoodie");
    }

    #[test]
    fn added_flag_collapses_to_yes_or_no() {
        let closet = load(
            "a,Top,x,Red,Solid,b,New,1,1,Yes\n\
             a,Top,x,Red,Solid,b,New,1,1,\n\
             a,Top,x,Red,Solid,b,New,1,1,yes\n\
             a,Top,x,Red,Solid,b,New,1,1,No\n",
        )
        .unwrap();
        let flags: Vec<&str> = closet.iter().map(|c| c.added_flag()).collect();
        assert_eq!(flags, vec!["Yes", "No", "No", "No"]);
    }

    #[test]
    fn malformed_price_becomes_none() {
        let closet = load("scarf,Accessory,Scarf,Grey,Plaid,acne,Secondhand/Gifted,,free,No\n").unwrap();
        assert_eq!(closet[0].price, None);
        assert_eq!(closet[0].cost, None);
        assert_eq!(closet[0].category, Some(Category::Accessory));
    }

    #[test]
    fn missing_required_column_fails() {
        let df = frame_from_csv_bytes(b"Item,Brand\nhoodie,nike\n".to_vec()).unwrap();
        let err = load_inventory(&df, &TrackerConfig::default()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(_)));
    }

    #[test]
    fn unknown_or_blank_category_keeps_the_row() {
        let closet = load(
            "hoodie,Top,Sweater,Black,Solid,nike,New,40,40,Yes\n\
             belt,,Belt,Brown,Solid,gap,New,15,15,No\n\
             cape,Costume,x,Red,Solid,b,New,1,1,No\n\
             jeans,Bottom,Denim,Blue,Solid,levis,New,20,20,No\n",
        )
        .unwrap();
        let ids: Vec<u32> = closet.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
        assert_eq!(closet[0].category, Some(Category::Top));
        assert_eq!(closet[1].category, None);
        assert_eq!(closet[1].display_name, "1 Gap Belt - Brown");
        assert_eq!(closet[2].category_label(), None);
        assert_eq!(closet[3].category, Some(Category::Bottom));
    }

    #[test]
    fn category_parsing_accepts_plurals() {
        assert_eq!(Category::parse("full body"), Some(Category::FullBody));
        assert_eq!(Category::parse("Accessories"), Some(Category::Accessory));
        assert_eq!(Category::parse(" TOPS "), Some(Category::Top));
        assert_eq!(Category::parse("hat"), None);
    }
}
