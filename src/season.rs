use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};

use crate::inventory::Category;
use crate::metrics::WornTable;
use crate::wear_log::WearEvent;

const SPRING_START: u32 = 79;
const SUMMER_START: u32 = 172;
const FALL_START: u32 = 265;
const WINTER_START: u32 = 355;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Fall, Season::Winter];

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
            Season::Winter => "Winter",
        }
    }

    pub fn of_date(date: NaiveDate) -> Self {
        season(date.ordinal())
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed day-of-year buckets: Spring [79,172), Summer [172,265),
/// Fall [265,355), Winter everything else (wraps the year end).
pub fn season(day_of_year: u32) -> Season {
    match day_of_year {
        SPRING_START..SUMMER_START => Season::Spring,
        SUMMER_START..FALL_START => Season::Summer,
        FALL_START..WINTER_START => Season::Fall,
        _ => Season::Winter,
    }
}

/// Wear counts per season, overall and per category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeasonBreakdown {
    pub totals: BTreeMap<Season, usize>,
    pub by_category: BTreeMap<(Category, Season), usize>,
}

impl SeasonBreakdown {
    pub fn total(&self, season: Season) -> usize {
        self.totals.get(&season).copied().unwrap_or(0)
    }

    pub fn for_category(&self, category: Category, season: Season) -> usize {
        self.by_category
            .get(&(category, season))
            .copied()
            .unwrap_or(0)
    }
}

/// Bucket wear events by season. Events for items missing from `table`
/// are skipped, matching the aggregated counts.
pub fn season_breakdown(table: &WornTable, events: &[WearEvent]) -> SeasonBreakdown {
    let mut breakdown = SeasonBreakdown::default();
    for event in events {
        let Some(row) = table.get(event.item_id) else {
            continue;
        };
        let season = Season::of_date(event.date);
        *breakdown.totals.entry(season).or_default() += 1;
        if let Some(category) = row.item.category {
            *breakdown.by_category.entry((category, season)).or_default() += 1;
        }
    }
    breakdown
}
