//! Materialise typed result tables as Polars DataFrames for the chart layer.
use chrono::NaiveDate;
use polars::prelude::*;

use crate::calendar::CalendarDay;
use crate::error::LoadError;
use crate::metrics::{CostPerWearRow, WornMetrics};
use crate::schema::{calendar, cost_per_wear, worn};

pub fn worn_frame(rows: &[WornMetrics]) -> Result<DataFrame, LoadError> {
    let ids: Vec<i64> = rows.iter().map(|r| i64::from(r.item.id)).collect();
    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    let display_names: Vec<&str> = rows.iter().map(|r| r.item.display_name.as_str()).collect();
    let labels: Vec<&str> = rows.iter().map(|r| r.item.item_label.as_str()).collect();
    let categories: Vec<Option<&str>> = rows.iter().map(|r| r.item.category_label()).collect();
    let sub_categories: Vec<Option<&str>> = rows.iter().map(|r| r.item.sub_category.as_deref()).collect();
    let colors: Vec<Option<&str>> = rows.iter().map(|r| r.item.color_text.as_deref()).collect();
    let patterns: Vec<Option<&str>> = rows.iter().map(|r| r.item.pattern.as_deref()).collect();
    let brands: Vec<&str> = rows.iter().map(|r| r.item.brand.as_str()).collect();
    let bought: Vec<Option<&str>> = rows.iter().map(|r| r.item.bought_via.as_deref()).collect();
    let prices: Vec<Option<f64>> = rows.iter().map(|r| r.item.price).collect();
    let costs: Vec<Option<f64>> = rows.iter().map(|r| r.item.cost).collect();
    let added: Vec<&str> = rows.iter().map(|r| r.item.added_flag()).collect();
    let counts: Vec<i64> = rows.iter().map(|r| i64::from(r.wear_count)).collect();

    let df = DataFrame::new(vec![
        Column::new(worn::ID.into(), ids),
        Column::new(worn::NAME.into(), names),
        Column::new(worn::DISPLAY_NAME.into(), display_names),
        Column::new(worn::ITEM_LABEL.into(), labels),
        Column::new(worn::CATEGORY.into(), categories),
        Column::new(worn::SUB_CATEGORY.into(), sub_categories),
        Column::new(worn::COLOR_TEXT.into(), colors),
        Column::new(worn::PATTERN.into(), patterns),
        Column::new(worn::BRAND.into(), brands),
        Column::new(worn::BOUGHT_VIA.into(), bought),
        Column::new(worn::PRICE.into(), prices),
        Column::new(worn::COST.into(), costs),
        Column::new(worn::ADDED_CURRENT_YEAR.into(), added),
        Column::new(worn::WEAR_COUNT.into(), counts),
    ])?;
    Ok(df)
}

pub fn cost_per_wear_frame(rows: &[CostPerWearRow]) -> Result<DataFrame, LoadError> {
    let ids: Vec<i64> = rows.iter().map(|r| i64::from(r.id)).collect();
    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    let categories: Vec<Option<&str>> = rows.iter().map(|r| r.category.map(|c| c.as_str())).collect();
    let prices: Vec<f64> = rows.iter().map(|r| r.price).collect();
    let counts: Vec<i64> = rows.iter().map(|r| i64::from(r.wear_count)).collect();
    let cpw: Vec<f64> = rows.iter().map(|r| r.cost_per_wear).collect();
    let labels: Vec<String> = rows.iter().map(CostPerWearRow::label).collect();

    let df = DataFrame::new(vec![
        Column::new(worn::ID.into(), ids),
        Column::new(worn::NAME.into(), names),
        Column::new(worn::CATEGORY.into(), categories),
        Column::new(worn::PRICE.into(), prices),
        Column::new(worn::WEAR_COUNT.into(), counts),
        Column::new(cost_per_wear::COST_PER_WEAR.into(), cpw),
        Column::new(cost_per_wear::COST_PER_WEAR_LABEL.into(), labels),
    ])?;
    Ok(df)
}

pub fn calendar_frame(days: &[CalendarDay]) -> Result<DataFrame, LoadError> {
    let dates: Vec<NaiveDate> = days.iter().map(|d| d.date).collect();
    let weekdays: Vec<&str> = days.iter().map(CalendarDay::day_of_week).collect();
    let iso_weeks: Vec<i64> = days.iter().map(|d| i64::from(d.iso_week)).collect();
    let buckets: Vec<String> = days.iter().map(CalendarDay::week_bucket).collect();
    let present: Vec<bool> = days.iter().map(|d| d.present).collect();

    let df = DataFrame::new(vec![
        Column::new(calendar::DATE.into(), dates),
        Column::new(calendar::DAY_OF_WEEK.into(), weekdays),
        Column::new(calendar::ISO_WEEK.into(), iso_weeks),
        Column::new(calendar::WEEK_BUCKET.into(), buckets),
        Column::new(calendar::PRESENT.into(), present),
    ])?;
    Ok(df)
}
