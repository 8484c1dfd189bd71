//! Handlers for the `/async-jobs` resource.
//!
//! All endpoints require authentication via [`AuthUser`].

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use fitness_core::error::CoreError;
use fitness_core::types::DbId;
use fitness_db::models::async_job::{AsyncJob, CreateAsyncJob};
use serde::Serialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Response body for `GET /async-jobs`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AsyncJobList {
    pub async_jobs: Vec<AsyncJob>,
    pub count: usize,
}

/// POST /async-jobs
///
/// Create a job and start it in the background. Returns 201 with the job in
/// `pending` status; progress is observed by polling.
pub async fn create_async_job(
    auth: AuthUser,
    State(state): State<AppState>,
    body: Result<Json<CreateAsyncJob>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = body.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    input.validate()?;

    let job_type = input.job_type.as_deref().unwrap_or_default();
    let job = state.dispatcher.submit(job_type).await?;

    tracing::info!(
        job_id = job.id,
        job_type = %job.job_type,
        user_id = auth.user_id,
        "Async job submitted",
    );

    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /async-jobs
pub async fn list_async_jobs(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<AsyncJobList>> {
    let async_jobs = state.jobs.list_all().await?;
    let count = async_jobs.len();
    Ok(Json(AsyncJobList { async_jobs, count }))
}

/// GET /async-jobs/{id}
pub async fn get_async_job(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
) -> AppResult<Json<AsyncJob>> {
    let job = state
        .jobs
        .find_by_id(job_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "AsyncJob",
            id: job_id,
        }))?;
    Ok(Json(job))
}
