//! Store traits the job engine depends on, plus their Postgres implementation.
//!
//! The engine holds these as `Arc<dyn ...>` so it can run against any backing
//! store; [`PgStore`] forwards to the repositories.

use async_trait::async_trait;
use fitness_core::async_job::JobType;
use fitness_core::types::DbId;

use crate::models::async_job::AsyncJob;
use crate::models::exercise::CreateExercise;
use crate::models::status::AsyncJobStatus;
use crate::repositories::{AsyncJobRepo, ExerciseRepo};
use crate::DbPool;

/// Persisted job records.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Insert a job in `pending` status.
    async fn create(&self, job_type: JobType) -> Result<AsyncJob, sqlx::Error>;

    /// Overwrite a job's status and error message (last write wins).
    async fn update_status(
        &self,
        id: DbId,
        status: AsyncJobStatus,
        error_message: Option<&str>,
    ) -> Result<(), sqlx::Error>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<AsyncJob>, sqlx::Error>;

    async fn list_all(&self) -> Result<Vec<AsyncJob>, sqlx::Error>;
}

/// Persisted exercises, as seen by the catalog import.
#[async_trait]
pub trait ExerciseStore: Send + Sync {
    async fn exists_by_external_id(&self, external_id: &str) -> Result<bool, sqlx::Error>;

    /// Insert all exercises atomically in a single call.
    async fn create_batch(&self, exercises: &[CreateExercise]) -> Result<u64, sqlx::Error>;
}

/// Postgres-backed implementation of both stores.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobStore for PgStore {
    async fn create(&self, job_type: JobType) -> Result<AsyncJob, sqlx::Error> {
        AsyncJobRepo::create(&self.pool, job_type).await
    }

    async fn update_status(
        &self,
        id: DbId,
        status: AsyncJobStatus,
        error_message: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        AsyncJobRepo::update_status(&self.pool, id, status, error_message).await
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<AsyncJob>, sqlx::Error> {
        AsyncJobRepo::find_by_id(&self.pool, id).await
    }

    async fn list_all(&self) -> Result<Vec<AsyncJob>, sqlx::Error> {
        AsyncJobRepo::list_all(&self.pool).await
    }
}

#[async_trait]
impl ExerciseStore for PgStore {
    async fn exists_by_external_id(&self, external_id: &str) -> Result<bool, sqlx::Error> {
        ExerciseRepo::exists_by_external_id(&self.pool, external_id).await
    }

    async fn create_batch(&self, exercises: &[CreateExercise]) -> Result<u64, sqlx::Error> {
        ExerciseRepo::create_batch(&self.pool, exercises).await
    }
}
