//! Route definitions for the `/async-jobs` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::async_jobs;
use crate::state::AppState;

/// Routes mounted at `/async-jobs`.
///
/// ```text
/// GET    /                -> list_async_jobs
/// POST   /                -> create_async_job
/// GET    /{id}            -> get_async_job
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(async_jobs::list_async_jobs).post(async_jobs::create_async_job),
        )
        .route("/{id}", get(async_jobs::get_async_job))
}
