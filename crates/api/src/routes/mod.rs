pub mod health;
pub mod rolls;

use axum::Router;

use crate::state::AppState;

/// Build the full route tree.
///
/// ```text
/// GET    /                     service banner
/// GET    /health               service and database health
/// POST   /rolls                create roll (also /rolls/)
/// GET    /rolls                filtered list (also /rolls/)
/// GET    /rolls/statistics     window statistics
/// DELETE /rolls/{roll_id}      soft-delete roll
/// ```
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(rolls::router())
}
