//! Aggregate statistics report and the raw rows it is assembled from.

use chrono::NaiveDate;
use rollstock_core::statistics::{DayExtrema, DayTotals};
use serde::Serialize;
use sqlx::FromRow;

/// Response body for `GET /rolls/statistics`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RollStatistics {
    pub added_count: i64,
    pub removed_count: i64,
    pub avg_length: Option<f64>,
    pub avg_weight: Option<f64>,
    pub min_length: Option<f64>,
    pub max_length: Option<f64>,
    pub min_weight: Option<f64>,
    pub max_weight: Option<f64>,
    pub total_weight: Option<f64>,
    /// Longest dwell among removed rolls, in days (2 decimals).
    pub max_interval: Option<f64>,
    /// Shortest dwell among removed rolls, in days (2 decimals).
    pub min_interval: Option<f64>,
    #[serde(flatten)]
    pub extrema: DayExtrema,
}

/// Rolls added and removed inside the window.
#[derive(Debug, Clone, FromRow)]
pub struct MovementCounts {
    pub added_count: i64,
    pub removed_count: i64,
}

/// Aggregates over the rolls present at some point in the window.
#[derive(Debug, Clone, FromRow)]
pub struct PresenceAggregates {
    pub avg_length: Option<f64>,
    pub avg_weight: Option<f64>,
    pub min_length: Option<f64>,
    pub max_length: Option<f64>,
    pub min_weight: Option<f64>,
    pub max_weight: Option<f64>,
    pub total_weight: Option<f64>,
    pub max_dwell_secs: Option<f64>,
    pub min_dwell_secs: Option<f64>,
}

/// One row of the per-day occupancy series.
#[derive(Debug, Clone, FromRow)]
pub struct DayTotalsRow {
    pub day: NaiveDate,
    pub rolls_count: i64,
    pub total_weight: f64,
}

impl From<DayTotalsRow> for DayTotals {
    fn from(row: DayTotalsRow) -> Self {
        DayTotals {
            day: row.day,
            rolls_count: row.rolls_count,
            total_weight: row.total_weight,
        }
    }
}
