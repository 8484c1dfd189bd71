//! Job submission.
//!
//! [`JobDispatcher::submit`] validates the requested type, writes the job row,
//! and starts the registered handler without waiting for it.

use std::sync::Arc;

use fitness_core::async_job::JobType;
use fitness_core::error::CoreError;
use fitness_db::models::async_job::AsyncJob;
use fitness_db::store::JobStore;

use super::registry::HandlerRegistry;
use super::supervisor::JobSupervisor;

/// Errors from [`JobDispatcher::submit`].
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// Unknown or unregistered job type. No job row was written.
    #[error(transparent)]
    Validation(CoreError),

    /// The job row could not be written.
    #[error("Failed to record job: {0}")]
    Persistence(#[from] sqlx::Error),
}

pub struct JobDispatcher {
    jobs: Arc<dyn JobStore>,
    handlers: HandlerRegistry,
    supervisor: Arc<JobSupervisor>,
}

impl JobDispatcher {
    pub fn new(
        jobs: Arc<dyn JobStore>,
        handlers: HandlerRegistry,
        supervisor: Arc<JobSupervisor>,
    ) -> Self {
        Self {
            jobs,
            handlers,
            supervisor,
        }
    }

    /// Record a new `pending` job of `job_type` and start it in the background.
    ///
    /// The returned job is the row as written; the caller never waits for the
    /// handler.
    pub async fn submit(&self, job_type: &str) -> Result<AsyncJob, DispatchError> {
        let job_type: JobType = job_type.parse().map_err(DispatchError::Validation)?;
        let handler = self.handlers.get(job_type).ok_or_else(|| {
            let registered: Vec<&str> = self
                .handlers
                .job_types()
                .into_iter()
                .map(JobType::as_str)
                .collect();
            let registered = if registered.is_empty() {
                "none".to_string()
            } else {
                registered.join(", ")
            };
            DispatchError::Validation(CoreError::Validation(format!(
                "Job type '{job_type}' cannot be run by this server. Registered types: {registered}"
            )))
        })?;

        let job = self.jobs.create(job_type).await?;
        tracing::info!(job_id = job.id, job_type = %job_type, "Async job created");

        self.supervisor.spawn(job.id, handler);
        Ok(job)
    }

    pub fn supervisor(&self) -> &Arc<JobSupervisor> {
        &self.supervisor
    }
}
