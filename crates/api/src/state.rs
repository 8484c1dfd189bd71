use std::sync::Arc;

use fitness_db::store::JobStore;

use crate::config::ServerConfig;
use crate::engine::dispatcher::JobDispatcher;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool, used for health checks.
    pub pool: fitness_db::DbPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// Job records, read by the listing endpoints.
    pub jobs: Arc<dyn JobStore>,
    /// Validates, records, and launches submitted jobs.
    pub dispatcher: Arc<JobDispatcher>,
}
