use polars::prelude::DataFrame;
use tracing::{info, info_span, warn};

use crate::calendar::{calendar_presence, CalendarDay};
use crate::config::TrackerConfig;
use crate::error::LoadError;
use crate::inventory::{self, ClosetItem};
use crate::metrics::{aggregate, WornTable};
use crate::season::{season_breakdown, SeasonBreakdown};
use crate::wear_log::{self, WearLog};

/// One synchronous recomputation from the two source tables.
#[derive(Debug, Clone)]
pub struct Tracker {
    config: TrackerConfig,
}

/// Everything derived in one run. Read-only once built.
#[derive(Debug, Clone)]
pub struct TrackerReport {
    pub inventory: Vec<ClosetItem>,
    pub wear_log: WearLog,
    pub table: WornTable,
}

impl Tracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Load both CSVs named by the config and aggregate them.
    pub fn run(&self) -> Result<TrackerReport, LoadError> {
        let _span = info_span!("tracker_run", base_path = %self.config.base_path.display()).entered();
        let inventory = inventory::load_inventory_csv(&self.config)?;
        let wear_log = wear_log::load_wear_events_csv(&self.config)?;
        self.finish(inventory, wear_log)
    }

    /// Same as [`Tracker::run`] for tables that are already in memory.
    pub fn run_frames(
        &self,
        inventory_df: &DataFrame,
        wear_log_df: &DataFrame,
    ) -> Result<TrackerReport, LoadError> {
        let inventory = inventory::load_inventory(inventory_df, &self.config)?;
        let wear_log = wear_log::load_wear_events(wear_log_df, &self.config.wear_log)?;
        self.finish(inventory, wear_log)
    }

    fn finish(&self, inventory: Vec<ClosetItem>, wear_log: WearLog) -> Result<TrackerReport, LoadError> {
        let table = aggregate(&inventory, &wear_log.events)?;
        if table.orphaned_events > 0 {
            warn!(
                orphaned = table.orphaned_events,
                "wear events skipped: no matching inventory id"
            );
        }
        info!(
            items = table.len(),
            wears = table.total_wears(),
            never_worn = table.never_worn().len(),
            dropped_cells = wear_log.dropped.total(),
            "closet metrics computed"
        );
        Ok(TrackerReport {
            inventory,
            wear_log,
            table,
        })
    }
}

impl TrackerReport {
    pub fn calendar(&self, item_id: u32) -> Result<Vec<CalendarDay>, LoadError> {
        if self.table.get(item_id).is_none() {
            return Err(LoadError::InvalidData(format!("unknown item id {item_id}")));
        }
        Ok(calendar_presence(&self.wear_log, item_id))
    }

    pub fn seasons(&self) -> SeasonBreakdown {
        season_breakdown(&self.table, &self.wear_log.events)
    }
}
