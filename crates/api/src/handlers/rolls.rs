//! Handlers for the `/rolls` resource.
//!
//! Rolls are registered, soft-deleted when they leave the warehouse, listed
//! with optional range filters, and summarised over a date window.

use axum::extract::{Path, Query, State};
use axum::Json;
use rollstock_core::error::CoreError;
use rollstock_core::statistics::StatisticsWindow;
use rollstock_core::types::DbId;
use rollstock_db::models::roll::{CreateRoll, Roll, RollFilter};
use rollstock_db::models::statistics::RollStatistics;
use rollstock_db::repositories::{RemoveOutcome, RollRepo};
use validator::Validate;

use crate::error::AppResult;
use crate::query::StatisticsQuery;
use crate::state::AppState;

/// POST /rolls
///
/// Register a new roll. Length and weight must both be positive; nothing is
/// written otherwise.
pub async fn create_roll(
    State(state): State<AppState>,
    Json(input): Json<CreateRoll>,
) -> AppResult<Json<Roll>> {
    input.validate().map_err(|_| {
        CoreError::Validation("Length and weight must be positive".to_string())
    })?;

    let roll = RollRepo::create(&state.pool, &input).await?;
    tracing::info!(
        roll_id = roll.id,
        length = roll.length,
        weight = roll.weight,
        "Roll added"
    );
    Ok(Json(roll))
}

/// DELETE /rolls/{roll_id}
///
/// Mark a roll as removed. Returns 404 for an unknown id and 400 if the roll
/// was already removed.
pub async fn remove_roll(
    State(state): State<AppState>,
    Path(roll_id): Path<DbId>,
) -> AppResult<Json<Roll>> {
    match RollRepo::remove(&state.pool, roll_id).await? {
        RemoveOutcome::Removed(roll) => {
            tracing::info!(roll_id, "Roll removed");
            Ok(Json(roll))
        }
        RemoveOutcome::NotFound => Err(CoreError::NotFound {
            entity: "Roll",
            id: roll_id,
        }
        .into()),
        RemoveOutcome::AlreadyRemoved => {
            Err(CoreError::InvalidState("Roll already removed".to_string()).into())
        }
    }
}

/// GET /rolls
pub async fn list_rolls(
    State(state): State<AppState>,
    Query(filter): Query<RollFilter>,
) -> AppResult<Json<Vec<Roll>>> {
    let rolls = RollRepo::list(&state.pool, &filter).await?;
    Ok(Json(rolls))
}

/// GET /rolls/statistics
///
/// Both bounds are required and `start_date` must not be after `end_date`;
/// an inverted window is rejected before any query runs.
pub async fn get_statistics(
    State(state): State<AppState>,
    Query(params): Query<StatisticsQuery>,
) -> AppResult<Json<RollStatistics>> {
    let window = StatisticsWindow::new(params.start_date, params.end_date)?;
    let stats = RollRepo::statistics(&state.pool, &window).await?;
    Ok(Json(stats))
}
