//! Repository for the `async_jobs` table.
//!
//! Status writes are plain last-write-wins updates; lifecycle ordering is
//! enforced by the job's owner, not here.

use fitness_core::async_job::JobType;
use fitness_core::types::DbId;
use sqlx::PgPool;

use crate::models::async_job::AsyncJob;
use crate::models::status::AsyncJobStatus;

/// Column list for `async_jobs` queries.
const COLUMNS: &str = "id, job_type, status_id, error_message, created_at, updated_at";

/// Provides create/update/list operations for async jobs.
pub struct AsyncJobRepo;

impl AsyncJobRepo {
    /// Insert a new job in `pending` status.
    pub async fn create(pool: &PgPool, job_type: JobType) -> Result<AsyncJob, sqlx::Error> {
        let query = format!(
            "INSERT INTO async_jobs (job_type, status_id) \
             VALUES ($1, $2) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AsyncJob>(&query)
            .bind(job_type.as_str())
            .bind(AsyncJobStatus::Pending.id())
            .fetch_one(pool)
            .await
    }

    /// Set a job's status and error message, bumping `updated_at`.
    ///
    /// Passing `None` clears any previous error message.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: AsyncJobStatus,
        error_message: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE async_jobs \
             SET status_id = $2, error_message = $3, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(status.id())
        .bind(error_message)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Find a job by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<AsyncJob>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM async_jobs WHERE id = $1");
        sqlx::query_as::<_, AsyncJob>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List every job, oldest first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<AsyncJob>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM async_jobs ORDER BY id");
        sqlx::query_as::<_, AsyncJob>(&query).fetch_all(pool).await
    }
}
