use std::path::PathBuf;

use pyo3::prelude::*;
use pyo3::types::PyModule;
use pyo3_polars::PyDataFrame;

use crate::composition;
use crate::config::TrackerConfig;
use crate::error::LoadError;
use crate::frame;
use crate::metrics::WornMetrics;
use crate::pipeline::{Tracker, TrackerReport};
use crate::schema;
use crate::season::Season;
use crate::source;

#[pyclass]
pub struct WearTracker {
    tracker: Tracker,
    report: Option<TrackerReport>,
}

#[pymethods]
impl WearTracker {
    #[new]
    #[pyo3(signature = (base_path, config_toml=None))]
    fn new(base_path: String, config_toml: Option<&str>) -> PyResult<Self> {
        let mut config = match config_toml {
            Some(content) => TrackerConfig::from_toml_str(content)?,
            None => TrackerConfig::default(),
        };
        config.base_path = PathBuf::from(base_path);
        Ok(Self {
            tracker: Tracker::new(config),
            report: None,
        })
    }

    // ── Loading ─────────────────────────────────────────────────────────────

    /// Load both CSVs from disk and recompute every metric.
    fn run(&mut self) -> PyResult<()> {
        self.report = Some(self.tracker.run()?);
        Ok(())
    }

    /// Recompute from DataFrames the caller already has (e.g. a fetched sheet).
    fn run_frames(&mut self, inventory: PyDataFrame, wear_log: PyDataFrame) -> PyResult<()> {
        self.report = Some(self.tracker.run_frames(&inventory.0, &wear_log.0)?);
        Ok(())
    }

    #[staticmethod]
    fn sheet_export_url(edit_url: &str) -> PyResult<String> {
        Ok(source::sheet_export_url(edit_url)?)
    }

    // ── Tables ──────────────────────────────────────────────────────────────

    fn worn_df(&self) -> PyResult<PyDataFrame> {
        let report = self.report()?;
        Ok(PyDataFrame(frame::worn_frame(report.table.rows())?))
    }

    #[pyo3(signature = (k=10))]
    fn top_worn_df(&self, k: usize) -> PyResult<PyDataFrame> {
        let report = self.report()?;
        Ok(PyDataFrame(ranked_frame(&report.table.top_k(k))?))
    }

    #[pyo3(signature = (k=10))]
    fn least_worn_df(&self, k: usize) -> PyResult<PyDataFrame> {
        let report = self.report()?;
        Ok(PyDataFrame(ranked_frame(&report.table.bottom_k(k))?))
    }

    fn never_worn_df(&self) -> PyResult<PyDataFrame> {
        let report = self.report()?;
        Ok(PyDataFrame(ranked_frame(&report.table.never_worn())?))
    }

    fn cost_per_wear_df(&self) -> PyResult<PyDataFrame> {
        let report = self.report()?;
        Ok(PyDataFrame(frame::cost_per_wear_frame(
            &report.table.cost_per_wear_rows(),
        )?))
    }

    fn calendar_df(&self, item_id: u32) -> PyResult<PyDataFrame> {
        let report = self.report()?;
        Ok(PyDataFrame(frame::calendar_frame(&report.calendar(item_id)?)?))
    }

    #[pyo3(signature = (k=10))]
    fn heatmap_choices(&self, k: usize) -> PyResult<Vec<(u32, String)>> {
        Ok(self.report()?.table.heatmap_choices(k))
    }

    // ── Closet composition ──────────────────────────────────────────────────

    fn color_composition(&self) -> PyResult<Vec<(String, usize)>> {
        Ok(composition::color_composition(&self.report()?.inventory))
    }

    fn category_composition(&self) -> PyResult<Vec<(String, usize)>> {
        Ok(composition::category_composition(&self.report()?.inventory)
            .into_iter()
            .map(|(category, n)| (category.to_string(), n))
            .collect())
    }

    /// `(kind, label, count)` where kind is "New" or "Secondhand".
    #[pyo3(signature = (new_items_only=false))]
    fn bought_breakdown(&self, new_items_only: bool) -> PyResult<Vec<(String, String, usize)>> {
        let inventory = &self.report()?.inventory;
        let breakdown = if new_items_only {
            composition::bought_breakdown(composition::new_items(inventory))
        } else {
            composition::bought_breakdown(inventory)
        };
        Ok(breakdown
            .into_iter()
            .map(|((kind, label), n)| (kind.to_string(), label, n))
            .collect())
    }

    /// `(season, wears)` in Spring, Summer, Fall, Winter order.
    fn season_totals(&self) -> PyResult<Vec<(String, usize)>> {
        let seasons = self.report()?.seasons();
        Ok(Season::ALL
            .into_iter()
            .map(|s| (s.to_string(), seasons.total(s)))
            .collect())
    }

    /// `(no_item_id, bad_date, notes_skipped, orphaned)` row counts.
    fn dropped_rows(&self) -> PyResult<(usize, usize, usize, usize)> {
        let report = self.report()?;
        let dropped = report.wear_log.dropped;
        Ok((
            dropped.no_item_id,
            dropped.bad_date,
            dropped.notes_skipped,
            report.table.orphaned_events,
        ))
    }
}

impl WearTracker {
    fn report(&self) -> Result<&TrackerReport, LoadError> {
        self.report
            .as_ref()
            .ok_or_else(|| LoadError::NotLoaded("closet data (call run first)".into()))
    }
}

fn ranked_frame(rows: &[&WornMetrics]) -> Result<polars::prelude::DataFrame, LoadError> {
    let owned: Vec<WornMetrics> = rows.iter().map(|r| (*r).clone()).collect();
    frame::worn_frame(&owned)
}

/// Export schema constants as Python submodules
fn add_schema_exports(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Worn
    let worn = PyModule::new(m.py(), "worn")?;
    worn.add("ID", schema::worn::ID)?;
    worn.add("NAME", schema::worn::NAME)?;
    worn.add("DISPLAY_NAME", schema::worn::DISPLAY_NAME)?;
    worn.add("ITEM_LABEL", schema::worn::ITEM_LABEL)?;
    worn.add("CATEGORY", schema::worn::CATEGORY)?;
    worn.add("SUB_CATEGORY", schema::worn::SUB_CATEGORY)?;
    worn.add("COLOR_TEXT", schema::worn::COLOR_TEXT)?;
    worn.add("PATTERN", schema::worn::PATTERN)?;
    worn.add("BRAND", schema::worn::BRAND)?;
    worn.add("BOUGHT_VIA", schema::worn::BOUGHT_VIA)?;
    worn.add("PRICE", schema::worn::PRICE)?;
    worn.add("COST", schema::worn::COST)?;
    worn.add("ADDED_CURRENT_YEAR", schema::worn::ADDED_CURRENT_YEAR)?;
    worn.add("WEAR_COUNT", schema::worn::WEAR_COUNT)?;
    m.add_submodule(&worn)?;

    // Cost per wear
    let cpw = PyModule::new(m.py(), "cost_per_wear")?;
    cpw.add("COST_PER_WEAR", schema::cost_per_wear::COST_PER_WEAR)?;
    cpw.add(
        "COST_PER_WEAR_LABEL",
        schema::cost_per_wear::COST_PER_WEAR_LABEL,
    )?;
    m.add_submodule(&cpw)?;

    // Calendar
    let calendar = PyModule::new(m.py(), "calendar")?;
    calendar.add("DATE", schema::calendar::DATE)?;
    calendar.add("DAY_OF_WEEK", schema::calendar::DAY_OF_WEEK)?;
    calendar.add("ISO_WEEK", schema::calendar::ISO_WEEK)?;
    calendar.add("WEEK_BUCKET", schema::calendar::WEEK_BUCKET)?;
    calendar.add("PRESENT", schema::calendar::PRESENT)?;
    m.add_submodule(&calendar)?;

    Ok(())
}

#[pymodule]
fn wear_tracekit(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<WearTracker>()?;
    add_schema_exports(m)?;
    Ok(())
}
