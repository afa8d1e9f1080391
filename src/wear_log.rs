use chrono::NaiveDate;
use polars::prelude::*;
use tracing::{info, warn};

use crate::config::{TrackerConfig, WearLogColumns};
use crate::error::LoadError;
use crate::source;

/// One (day, item) occurrence from the wear-tracking form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WearEvent {
    pub date: NaiveDate,
    /// Form column the reference came from.
    pub slot: String,
    pub item_ref_raw: String,
    pub item_id: u32,
}

/// Row-level data-quality drops. None of these abort a load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DropStats {
    /// Non-empty slot cells with no digit run.
    pub no_item_id: usize,
    /// Non-empty slot cells whose date matched no configured format.
    pub bad_date: usize,
    /// Non-empty cells in the notes column.
    pub notes_skipped: usize,
}

impl DropStats {
    pub fn total(&self) -> usize {
        self.no_item_id + self.bad_date
    }
}

#[derive(Debug, Clone, Default)]
pub struct WearLog {
    pub events: Vec<WearEvent>,
    pub dropped: DropStats,
    /// Earliest parsed date of any row with a non-empty cell, whether or
    /// not that cell yielded an event.
    pub first_date: Option<NaiveDate>,
}

impl WearLog {
    /// Minimum date present in the log, including rows that produced no events.
    pub fn min_date(&self) -> Option<NaiveDate> {
        self.first_date
            .into_iter()
            .chain(self.events.iter().map(|e| e.date))
            .min()
    }

    pub fn events_for(&self, item_id: u32) -> impl Iterator<Item = &WearEvent> {
        self.events.iter().filter(move |e| e.item_id == item_id)
    }
}

/// First run of ASCII digits in `raw`, e.g. "3 Nike Hoodie - Black" -> 3.
/// Runs too large for an id are treated as absent. Non-ASCII decimal digits
/// (Arabic-Indic, full-width, ...) are not recognised.
pub fn extract_item_id(raw: &str) -> Option<u32> {
    let start = raw.find(|c: char| c.is_ascii_digit())?;
    let digits = &raw[start..];
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse().ok()
}

pub fn parse_date(raw: &str, formats: &[String]) -> Option<NaiveDate> {
    let raw = raw.trim();
    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// Read the wear-log CSV named by the config.
pub fn load_wear_events_csv(config: &TrackerConfig) -> Result<WearLog, LoadError> {
    let df = source::read_csv(&config.wear_log_path())?;
    load_wear_events(&df, &config.wear_log)
}

/// Unpivot the wide wear log (one row per date, one column per slot) into
/// wear events, slot by slot in column order.
pub fn load_wear_events(df: &DataFrame, cols: &WearLogColumns) -> Result<WearLog, LoadError> {
    source::require_columns(df, &[cols.date.as_str()])?;

    let slots: Vec<String> = df
        .get_column_names_str()
        .into_iter()
        .filter(|name| {
            *name != cols.date
                && cols.timestamp.as_deref() != Some(*name)
                && cols.notes.as_deref() != Some(*name)
        })
        .map(str::to_string)
        .collect();

    let mut string_cols: Vec<&str> = slots.iter().map(String::as_str).collect();
    string_cols.push(cols.date.as_str());
    let notes_col = cols
        .notes
        .as_deref()
        .filter(|n| df.column(n).is_ok());
    if let Some(notes) = notes_col {
        string_cols.push(notes);
    }
    let df = source::columns_as_strings(df, &string_cols)?;

    let dates: Vec<Option<NaiveDate>> = df
        .column(&cols.date)?
        .str()?
        .into_iter()
        .map(|d| d.and_then(|d| parse_date(d, &cols.date_formats)))
        .collect();

    let mut log = WearLog::default();
    let mut filled = vec![false; df.height()];

    if let Some(notes) = notes_col {
        for (row, cell) in df.column(notes)?.str()?.into_iter().enumerate() {
            if cell.is_some_and(|c| !c.trim().is_empty()) {
                log.dropped.notes_skipped += 1;
                filled[row] = true;
            }
        }
    }

    for slot in &slots {
        let cells = df.column(slot)?.str()?;
        for (row, cell) in cells.into_iter().enumerate() {
            let Some(cell) = cell.map(str::trim).filter(|c| !c.is_empty()) else {
                continue;
            };
            filled[row] = true;
            let Some(item_id) = extract_item_id(cell) else {
                log.dropped.no_item_id += 1;
                continue;
            };
            let Some(date) = dates[row] else {
                log.dropped.bad_date += 1;
                continue;
            };
            log.events.push(WearEvent {
                date,
                slot: slot.clone(),
                item_ref_raw: cell.to_string(),
                item_id,
            });
        }
    }

    log.first_date = dates
        .iter()
        .zip(&filled)
        .filter_map(|(date, &has_cell)| (*date).filter(|_| has_cell))
        .min();

    if log.dropped.total() > 0 {
        warn!(
            no_item_id = log.dropped.no_item_id,
            bad_date = log.dropped.bad_date,
            "dropped wear-log cells"
        );
    }
    info!(
        events = log.events.len(),
        slots = slots.len(),
        days = df.height(),
        "wear log loaded"
    );
    Ok(log)
}
