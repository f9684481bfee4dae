//! Repository for the `rolls` table.
//!
//! Every operation runs inside its own transaction. A transaction that is
//! dropped before `commit` (early `?` return, panic unwinding) is rolled back
//! and its connection goes back to the pool.

use rollstock_core::statistics::{dwell_days, find_day_extrema, DayTotals, StatisticsWindow};
use rollstock_core::time::now_utc;
use rollstock_core::types::DbId;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgPool, Postgres};

use crate::models::roll::{CreateRoll, FilterValue, Roll, RollFilter};
use crate::models::statistics::{
    DayTotalsRow, MovementCounts, PresenceAggregates, RollStatistics,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, length, weight, added_date, removed_date";

/// A roll counts toward window aggregates when its stay overlaps `[$1, $2]`.
const PRESENT_IN_WINDOW: &str =
    "added_date <= $2 AND (removed_date >= $1 OR removed_date IS NULL)";

/// Result of a soft-delete attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoveOutcome {
    /// The roll was present and is now marked removed.
    Removed(Roll),
    /// No roll with that id exists.
    NotFound,
    /// The roll had already been removed; nothing changed.
    AlreadyRemoved,
}

/// Provides create, soft-delete, filtered listing and statistics for rolls.
pub struct RollRepo;

impl RollRepo {
    /// Insert a new roll stamped with the current second, returning the stored row.
    pub async fn create(pool: &PgPool, input: &CreateRoll) -> Result<Roll, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO rolls (length, weight, added_date)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let roll = sqlx::query_as::<_, Roll>(&query)
            .bind(input.length)
            .bind(input.weight)
            .bind(now_utc())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(roll)
    }

    /// Find a roll by id, removed or not.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Roll>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM rolls WHERE id = $1");
        sqlx::query_as::<_, Roll>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Mark a present roll as removed at the current second.
    ///
    /// The transition is one-way: the update only matches rows whose
    /// `removed_date` is still NULL, so an existing removal date is never
    /// overwritten.
    pub async fn remove(pool: &PgPool, id: DbId) -> Result<RemoveOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let select = format!("SELECT {COLUMNS} FROM rolls WHERE id = $1");
        let existing = sqlx::query_as::<_, Roll>(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        match existing {
            None => return Ok(RemoveOutcome::NotFound),
            Some(roll) if roll.is_removed() => return Ok(RemoveOutcome::AlreadyRemoved),
            Some(_) => {}
        }

        let update = format!(
            "UPDATE rolls SET removed_date = $2
             WHERE id = $1 AND removed_date IS NULL
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Roll>(&update)
            .bind(id)
            .bind(now_utc())
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;

        // A concurrent removal committed between our read and our update.
        Ok(updated.map_or(RemoveOutcome::AlreadyRemoved, RemoveOutcome::Removed))
    }

    /// List rolls matching every supplied bound of `filter`, ordered by id.
    pub async fn list(pool: &PgPool, filter: &RollFilter) -> Result<Vec<Roll>, sqlx::Error> {
        let (where_clause, bind_values) = build_roll_filter(filter);
        tracing::debug!(predicates = bind_values.len(), "Listing rolls");

        let query = format!("SELECT {COLUMNS} FROM rolls {where_clause} ORDER BY id");
        bind_filter_values(sqlx::query_as::<_, Roll>(&query), &bind_values)
            .fetch_all(pool)
            .await
    }

    /// Compute the full statistics report for `window`.
    ///
    /// All queries share one read-only snapshot so the counts, aggregates
    /// and day series describe the same state of the table.
    pub async fn statistics(
        pool: &PgPool,
        window: &StatisticsWindow,
    ) -> Result<RollStatistics, sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let counts = sqlx::query_as::<_, MovementCounts>(
            "SELECT
                COUNT(*) FILTER (WHERE added_date BETWEEN $1 AND $2) AS added_count,
                COUNT(*) FILTER (WHERE removed_date BETWEEN $1 AND $2) AS removed_count
             FROM rolls",
        )
        .bind(window.start)
        .bind(window.end)
        .fetch_one(&mut *tx)
        .await?;

        let aggregates_query = format!(
            "SELECT
                AVG(length) AS avg_length,
                AVG(weight) AS avg_weight,
                MIN(length) AS min_length,
                MAX(length) AS max_length,
                MIN(weight) AS min_weight,
                MAX(weight) AS max_weight,
                SUM(weight) AS total_weight,
                EXTRACT(EPOCH FROM MAX(removed_date - added_date))::float8 AS max_dwell_secs,
                EXTRACT(EPOCH FROM MIN(removed_date - added_date))::float8 AS min_dwell_secs
             FROM rolls
             WHERE {PRESENT_IN_WINDOW}"
        );
        let aggregates = sqlx::query_as::<_, PresenceAggregates>(&aggregates_query)
            .bind(window.start)
            .bind(window.end)
            .fetch_one(&mut *tx)
            .await?;

        let (first_day, last_day) = window.day_bounds();
        let series: Vec<DayTotals> = sqlx::query_as::<_, DayTotalsRow>(
            "SELECT
                series.day::date AS day,
                COUNT(r.id) AS rolls_count,
                COALESCE(SUM(r.weight), 0)::float8 AS total_weight
             FROM generate_series($1::date::timestamp, $2::date::timestamp, interval '1 day')
                AS series(day)
             LEFT JOIN rolls r
                ON r.added_date < (series.day + interval '1 day') AT TIME ZONE 'UTC'
               AND (r.removed_date >= series.day AT TIME ZONE 'UTC' OR r.removed_date IS NULL)
             GROUP BY series.day
             ORDER BY series.day",
        )
        .bind(first_day)
        .bind(last_day)
        .fetch_all(&mut *tx)
        .await?
        .into_iter()
        .map(DayTotals::from)
        .collect();

        tx.commit().await?;

        tracing::debug!(
            start = %window.start,
            end = %window.end,
            days = series.len(),
            "Computed roll statistics"
        );

        Ok(RollStatistics {
            added_count: counts.added_count,
            removed_count: counts.removed_count,
            avg_length: aggregates.avg_length,
            avg_weight: aggregates.avg_weight,
            min_length: aggregates.min_length,
            max_length: aggregates.max_length,
            min_weight: aggregates.min_weight,
            max_weight: aggregates.max_weight,
            total_weight: aggregates.total_weight,
            max_interval: aggregates.max_dwell_secs.map(dwell_days),
            min_interval: aggregates.min_dwell_secs.map(dwell_days),
            extrema: find_day_extrema(&series),
        })
    }
}

// ---------------------------------------------------------------------------
// Internal helpers for dynamic query building
// ---------------------------------------------------------------------------

/// Build a WHERE clause and bind values from the filter's predicates.
///
/// The clause is empty when no bound is supplied, otherwise starts with `WHERE `.
fn build_roll_filter(filter: &RollFilter) -> (String, Vec<FilterValue>) {
    let predicates = filter.predicates();

    let conditions: Vec<String> = predicates
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{} {} ${}", p.column, p.bound.operator(), i + 1))
        .collect();

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    let bind_values = predicates.into_iter().map(|p| p.value).collect();
    (where_clause, bind_values)
}

/// Bind a slice of `FilterValue` to a sqlx `QueryAs`.
fn bind_filter_values<'q, O>(
    mut q: QueryAs<'q, Postgres, O, PgArguments>,
    bind_values: &[FilterValue],
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for val in bind_values {
        match *val {
            FilterValue::BigInt(v) => q = q.bind(v),
            FilterValue::Float(v) => q = q.bind(v),
            FilterValue::Timestamp(v) => q = q.bind(v),
        }
    }
    q
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_bounds_means_no_where_clause() {
        let (clause, values) = build_roll_filter(&RollFilter::default());
        assert!(clause.is_empty());
        assert!(values.is_empty());
    }

    #[test]
    fn bounds_are_numbered_and_joined_with_and() {
        let filter = RollFilter {
            id_start: Some(1),
            id_end: Some(1),
            length_end: Some(20.0),
            ..Default::default()
        };
        let (clause, values) = build_roll_filter(&filter);
        assert_eq!(clause, "WHERE id >= $1 AND id <= $2 AND length <= $3");
        assert_eq!(
            values,
            vec![
                FilterValue::BigInt(1),
                FilterValue::BigInt(1),
                FilterValue::Float(20.0)
            ]
        );
    }
}
