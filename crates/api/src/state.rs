use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable: the pool is reference-counted internally and the
/// config sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool. Each request checks out its own connection.
    pub pool: rollstock_db::DbPool,
    pub config: Arc<ServerConfig>,
}
