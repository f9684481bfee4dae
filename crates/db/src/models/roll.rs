//! Roll entity model, create DTO, and list filter.

use rollstock_core::time::{deserialize_opt_instant, serialize_display, serialize_display_opt};
use rollstock_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `rolls` table.
///
/// Serializes timestamps in the display zone with second precision.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Roll {
    pub id: DbId,
    pub length: f64,
    pub weight: f64,
    #[serde(serialize_with = "serialize_display")]
    pub added_date: Timestamp,
    /// `None` while the roll is still in the warehouse.
    #[serde(serialize_with = "serialize_display_opt")]
    pub removed_date: Option<Timestamp>,
}

impl Roll {
    pub fn is_removed(&self) -> bool {
        self.removed_date.is_some()
    }
}

/// DTO for registering a new roll.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRoll {
    #[validate(range(exclusive_min = 0.0))]
    pub length: f64,
    #[validate(range(exclusive_min = 0.0))]
    pub weight: f64,
}

/// Optional inclusive range filters for listing rolls (`?id_start=&id_end=&...`).
///
/// Every supplied bound becomes one predicate; predicates are AND-ed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RollFilter {
    pub id_start: Option<DbId>,
    pub id_end: Option<DbId>,
    pub length_start: Option<f64>,
    pub length_end: Option<f64>,
    pub weight_start: Option<f64>,
    pub weight_end: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_opt_instant")]
    pub added_start: Option<Timestamp>,
    #[serde(default, deserialize_with = "deserialize_opt_instant")]
    pub added_end: Option<Timestamp>,
    #[serde(default, deserialize_with = "deserialize_opt_instant")]
    pub removed_start: Option<Timestamp>,
    #[serde(default, deserialize_with = "deserialize_opt_instant")]
    pub removed_end: Option<Timestamp>,
}

/// Typed bind value for a filter predicate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterValue {
    BigInt(i64),
    Float(f64),
    Timestamp(Timestamp),
}

/// Comparison applied by a filter predicate. Both sides are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    AtLeast,
    AtMost,
}

impl Bound {
    pub fn operator(self) -> &'static str {
        match self {
            Bound::AtLeast => ">=",
            Bound::AtMost => "<=",
        }
    }
}

/// One active filter: `column <op> value`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Predicate {
    pub column: &'static str,
    pub bound: Bound,
    pub value: FilterValue,
}

impl RollFilter {
    /// The predicates for every bound that was supplied, in a stable order.
    pub fn predicates(&self) -> Vec<Predicate> {
        let candidates = [
            ("id", Bound::AtLeast, self.id_start.map(FilterValue::BigInt)),
            ("id", Bound::AtMost, self.id_end.map(FilterValue::BigInt)),
            ("length", Bound::AtLeast, self.length_start.map(FilterValue::Float)),
            ("length", Bound::AtMost, self.length_end.map(FilterValue::Float)),
            ("weight", Bound::AtLeast, self.weight_start.map(FilterValue::Float)),
            ("weight", Bound::AtMost, self.weight_end.map(FilterValue::Float)),
            ("added_date", Bound::AtLeast, self.added_start.map(FilterValue::Timestamp)),
            ("added_date", Bound::AtMost, self.added_end.map(FilterValue::Timestamp)),
            ("removed_date", Bound::AtLeast, self.removed_start.map(FilterValue::Timestamp)),
            ("removed_date", Bound::AtMost, self.removed_end.map(FilterValue::Timestamp)),
        ];

        candidates
            .into_iter()
            .filter_map(|(column, bound, value)| {
                value.map(|value| Predicate {
                    column,
                    bound,
                    value,
                })
            })
            .collect()
    }
}
