use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::LoadError;
use crate::schema;

/// Where the two source tables live and how their columns are named.
///
/// Every field has a default matching the closet spreadsheet layout, so an
/// empty TOML document is a valid config.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub base_path: PathBuf,
    pub inventory_file: String,
    pub wear_log_file: String,
    pub inventory: InventoryColumns,
    pub wear_log: WearLogColumns,
    /// Characters of the raw colour text kept for `display_name`.
    pub color_prefix_len: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("."),
            inventory_file: "ClosetData.csv".to_string(),
            wear_log_file: "WearLog.csv".to_string(),
            inventory: InventoryColumns::default(),
            wear_log: WearLogColumns::default(),
            color_prefix_len: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InventoryColumns {
    pub item: String,
    pub brand: String,
    pub category: String,
    pub sub_category: String,
    pub color: String,
    pub pattern: String,
    pub bought: String,
    pub price: String,
    pub cost: String,
    pub added_current_year: String,
}

impl Default for InventoryColumns {
    fn default() -> Self {
        Self {
            item: schema::inventory::ITEM.to_string(),
            brand: schema::inventory::BRAND.to_string(),
            category: schema::inventory::CATEGORY.to_string(),
            sub_category: schema::inventory::SUB_CATEGORY.to_string(),
            color: schema::inventory::COLOR.to_string(),
            pattern: schema::inventory::PATTERN.to_string(),
            bought: schema::inventory::BOUGHT.to_string(),
            price: schema::inventory::PRICE.to_string(),
            cost: schema::inventory::COST.to_string(),
            added_current_year: schema::inventory::ADDED_CURRENT_YEAR.to_string(),
        }
    }
}

impl InventoryColumns {
    pub fn required(&self) -> [&str; 10] {
        [
            self.item.as_str(),
            self.brand.as_str(),
            self.category.as_str(),
            self.sub_category.as_str(),
            self.color.as_str(),
            self.pattern.as_str(),
            self.bought.as_str(),
            self.price.as_str(),
            self.cost.as_str(),
            self.added_current_year.as_str(),
        ]
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WearLogColumns {
    pub date: String,
    /// Form-submission metadata, dropped before unpivoting.
    pub timestamp: Option<String>,
    /// Free-text column that is not an item slot.
    pub notes: Option<String>,
    /// Tried in order for every date cell.
    pub date_formats: Vec<String>,
}

impl Default for WearLogColumns {
    fn default() -> Self {
        Self {
            date: schema::wear_log::DATE.to_string(),
            timestamp: Some(schema::wear_log::TIMESTAMP.to_string()),
            notes: None,
            date_formats: vec![
                "%m/%d/%Y".to_string(),
                "%Y-%m-%d".to_string(),
                "%d-%b-%Y".to_string(),
            ],
        }
    }
}

impl TrackerConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, LoadError> {
        let config: TrackerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn inventory_path(&self) -> PathBuf {
        self.base_path.join(&self.inventory_file)
    }

    pub fn wear_log_path(&self) -> PathBuf {
        self.base_path.join(&self.wear_log_file)
    }

    fn validate(&self) -> Result<(), LoadError> {
        if self.color_prefix_len == 0 {
            return Err(LoadError::Config(
                "color_prefix_len must be at least 1".to_string(),
            ));
        }
        if self.wear_log.date_formats.is_empty() {
            return Err(LoadError::Config(
                "wear_log.date_formats must list at least one format".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = TrackerConfig::from_toml_str("").unwrap();
        assert_eq!(config.inventory.added_current_year, "2023");
        assert_eq!(config.wear_log.date, "Date");
        assert_eq!(config.wear_log.timestamp.as_deref(), Some("Timestamp"));
        assert_eq!(config.color_prefix_len, 5);
        assert_eq!(config.inventory_path(), PathBuf::from("./ClosetData.csv"));
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = TrackerConfig::from_toml_str(
            r#"
            base_path = "/data"
            wear_log_file = "2024.csv"

            [inventory]
            added_current_year = "2024"

            [wear_log]
            notes = "Notes"
            "#,
        )
        .unwrap();
        assert_eq!(config.wear_log_path(), PathBuf::from("/data/2024.csv"));
        assert_eq!(config.inventory.added_current_year, "2024");
        assert_eq!(config.inventory.brand, "Brand");
        assert_eq!(config.wear_log.notes.as_deref(), Some("Notes"));
        assert_eq!(config.wear_log.date_formats.len(), 3);
    }

    #[test]
    fn zero_prefix_is_rejected() {
        let err = TrackerConfig::from_toml_str("color_prefix_len = 0").unwrap_err();
        assert!(matches!(err, LoadError::Config(_)));
    }

    #[test]
    fn malformed_toml_is_config_error() {
        let err = TrackerConfig::from_toml_str("base_path = [").unwrap_err();
        assert!(matches!(err, LoadError::Config(_)));
    }
}
