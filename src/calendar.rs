use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, TimeDelta, Weekday};

use crate::wear_log::{WearEvent, WearLog};

pub const CALENDAR_DAYS: usize = 365;

/// One cell of the heatmap grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub iso_week: u32,
    /// Sunday that opens this day's week (weeks run Sunday..Saturday).
    pub week_start: NaiveDate,
    pub present: bool,
}

impl CalendarDay {
    pub fn day_of_week(&self) -> &'static str {
        day_name(self.weekday)
    }

    /// Grid column label, `"%m-%d"` of the week start.
    pub fn week_bucket(&self) -> String {
        self.week_start.format("%m-%d").to_string()
    }
}

pub fn day_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - TimeDelta::days(i64::from(date.weekday().num_days_from_sunday()))
}

/// 365 consecutive days from the earliest date in the log, flagging the
/// days `item_id` was worn. An empty log gives an empty series.
pub fn calendar_presence(log: &WearLog, item_id: u32) -> Vec<CalendarDay> {
    match log.min_date() {
        Some(start) => calendar_from(start, &log.events, item_id),
        None => Vec::new(),
    }
}

/// Dense series starting at `start`. Wears outside the window are ignored.
pub fn calendar_from(start: NaiveDate, events: &[WearEvent], item_id: u32) -> Vec<CalendarDay> {
    let worn: HashSet<NaiveDate> = events
        .iter()
        .filter(|e| e.item_id == item_id)
        .map(|e| e.date)
        .collect();

    start
        .iter_days()
        .take(CALENDAR_DAYS)
        .map(|date| CalendarDay {
            date,
            weekday: date.weekday(),
            iso_week: date.iso_week().week(),
            week_start: week_start(date),
            present: worn.contains(&date),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wear_log::DropStats;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn wear(id: u32, date: NaiveDate) -> WearEvent {
        WearEvent {
            date,
            slot: "Top".to_string(),
            item_ref_raw: format!("{id} Hoodie"),
            item_id: id,
        }
    }

    #[test]
    fn dense_year_from_first_logged_day() {
        let log = WearLog {
            events: vec![
                wear(1, date(2023, 1, 5)),
                wear(0, date(2023, 1, 2)),
                wear(0, date(2023, 3, 1)),
                wear(0, date(2023, 3, 1)),
            ],
            dropped: DropStats::default(),
            first_date: None,
        };
        let days = calendar_presence(&log, 0);

        assert_eq!(days.len(), CALENDAR_DAYS);
        assert_eq!(days[0].date, date(2023, 1, 2));
        assert_eq!(days[364].date, date(2024, 1, 1));
        assert_eq!(days.iter().filter(|d| d.present).count(), 2);
        assert!(days[0].present);
        assert!(!days[3].present); // item 1's day
    }

    #[test]
    fn weekday_and_week_bucket() {
        // 2023-01-02 is a Monday; its week opens Sunday 2023-01-01.
        let days = calendar_from(date(2023, 1, 2), &[], 0);
        assert_eq!(days[0].day_of_week(), "Monday");
        assert_eq!(days[0].week_bucket(), "01-01");
        assert_eq!(days[0].iso_week, 1);
        // Saturday closes the same week, Sunday opens the next
        assert_eq!(days[5].day_of_week(), "Saturday");
        assert_eq!(days[5].week_bucket(), "01-01");
        assert_eq!(days[6].day_of_week(), "Sunday");
        assert_eq!(days[6].week_bucket(), "01-08");
        assert!(days.iter().all(|d| !d.present));
    }

    #[test]
    fn wears_outside_window_are_ignored() {
        let events = vec![wear(0, date(2022, 12, 31)), wear(0, date(2024, 6, 1))];
        let days = calendar_from(date(2023, 1, 1), &events, 0);
        assert!(days.iter().all(|d| !d.present));
    }

    #[test]
    fn series_starts_at_first_logged_row_even_without_wears() {
        let log = WearLog {
            events: vec![wear(0, date(2023, 1, 5))],
            dropped: DropStats::default(),
            first_date: Some(date(2023, 1, 1)),
        };
        let days = calendar_presence(&log, 0);
        assert_eq!(days[0].date, date(2023, 1, 1));
        assert_eq!(days[364].date, date(2023, 12, 31));
        assert!(days[4].present);
    }

    #[test]
    fn empty_log_gives_empty_series() {
        assert!(calendar_presence(&WearLog::default(), 0).is_empty());
    }
}
