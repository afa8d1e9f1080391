//! Closet wear tracking: join a clothing inventory with a daily wear log and
//! derive per-item wear metrics for a dashboard.
//!
//! Data flows one way: [`inventory`] → [`wear_log`] → [`metrics`], with
//! [`season`], [`calendar`] and [`composition`] deriving chart-ready views
//! from the aggregated table. Build with the `python` feature to expose the
//! pipeline to a Python chart layer.

pub mod calendar;
pub mod composition;
pub mod config;
pub mod error;
pub mod frame;
pub mod inventory;
pub mod metrics;
pub mod pipeline;
pub mod schema;
pub mod season;
pub mod source;
pub mod wear_log;

#[cfg(feature = "python")]
mod python;

pub use calendar::{calendar_presence, CalendarDay};
pub use config::TrackerConfig;
pub use error::LoadError;
pub use inventory::{load_inventory, Category, ClosetItem};
pub use metrics::{aggregate, WornMetrics, WornTable};
pub use pipeline::{Tracker, TrackerReport};
pub use season::{season, Season};
pub use wear_log::{load_wear_events, DropStats, WearEvent, WearLog};
