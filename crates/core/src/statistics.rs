//! Statistics window rules and the post-processing applied to the per-day
//! occupancy series.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::CoreError;
use crate::types::Timestamp;

/// Seconds in one day, used to express dwell time in fractional days.
pub const SECS_PER_DAY: f64 = 86_400.0;

/// A validated `[start, end]` window, both bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatisticsWindow {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl StatisticsWindow {
    /// Build a window, rejecting `start > end`.
    pub fn new(start: Timestamp, end: Timestamp) -> Result<Self, CoreError> {
        if start > end {
            return Err(CoreError::Validation(
                "Start date must be before end date".to_string(),
            ));
        }
        Ok(Self { start, end })
    }

    /// First and last UTC calendar day covered by the window.
    pub fn day_bounds(&self) -> (NaiveDate, NaiveDate) {
        (self.start.date_naive(), self.end.date_naive())
    }
}

/// Occupancy of the warehouse on one UTC calendar day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayTotals {
    pub day: NaiveDate,
    pub rolls_count: i64,
    pub total_weight: f64,
}

/// Days on which the series reaches its extremes. `None` only for an empty series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DayExtrema {
    pub day_min_count: Option<NaiveDate>,
    pub day_max_count: Option<NaiveDate>,
    pub day_min_weight: Option<NaiveDate>,
    pub day_max_weight: Option<NaiveDate>,
}

/// Running extreme for one metric: best value so far and the earliest day
/// that reached it.
struct Extreme<T> {
    value: T,
    day: NaiveDate,
}

impl<T: PartialOrd + Copy> Extreme<T> {
    /// Replace on a strictly better value; on a tie keep the earlier day.
    fn offer(slot: &mut Option<Self>, value: T, day: NaiveDate, better: fn(&T, &T) -> bool) {
        match slot {
            None => *slot = Some(Self { value, day }),
            Some(cur) if better(&value, &cur.value) => *cur = Self { value, day },
            Some(cur) if value == cur.value && day < cur.day => cur.day = day,
            Some(_) => {}
        }
    }
}

/// Scan the series once and pick, for each metric, the earliest day that
/// attains its minimum and its maximum.
pub fn find_day_extrema(series: &[DayTotals]) -> DayExtrema {
    let mut min_count: Option<Extreme<i64>> = None;
    let mut max_count: Option<Extreme<i64>> = None;
    let mut min_weight: Option<Extreme<f64>> = None;
    let mut max_weight: Option<Extreme<f64>> = None;

    for totals in series {
        Extreme::offer(&mut min_count, totals.rolls_count, totals.day, |a, b| a < b);
        Extreme::offer(&mut max_count, totals.rolls_count, totals.day, |a, b| a > b);
        Extreme::offer(&mut min_weight, totals.total_weight, totals.day, |a, b| a < b);
        Extreme::offer(&mut max_weight, totals.total_weight, totals.day, |a, b| a > b);
    }

    DayExtrema {
        day_min_count: min_count.map(|e| e.day),
        day_max_count: max_count.map(|e| e.day),
        day_min_weight: min_weight.map(|e| e.day),
        day_max_weight: max_weight.map(|e| e.day),
    }
}

/// Convert a dwell duration in seconds to days, rounded to 2 decimals.
pub fn dwell_days(secs: f64) -> f64 {
    (secs / SECS_PER_DAY * 100.0).round() / 100.0
}
