//! Route definitions for the `/rolls` resource.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::rolls;
use crate::state::AppState;

/// Routes for `/rolls`. Both the bare and trailing-slash collection paths
/// are accepted.
///
/// ```text
/// POST   /rolls                -> create_roll
/// GET    /rolls                -> list_rolls
/// GET    /rolls/statistics     -> get_statistics
/// DELETE /rolls/{roll_id}      -> remove_roll
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/rolls", get(rolls::list_rolls).post(rolls::create_roll))
        .route("/rolls/", get(rolls::list_rolls).post(rolls::create_roll))
        .route("/rolls/statistics", get(rolls::get_statistics))
        .route("/rolls/{roll_id}", delete(rolls::remove_roll))
}
