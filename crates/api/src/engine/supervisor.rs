//! Ownership of running job tasks.
//!
//! Every job runs in its own Tokio task, wrapped by a tracked watcher task.
//! The watcher observes how the job task ended; a panic or an abort is
//! contained there. Whatever the outcome, a job that is not terminal once
//! its task is over is finalized as `error`.

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use fitness_core::types::DbId;
use fitness_db::models::status::AsyncJobStatus;
use fitness_db::store::JobStore;
use tokio::task::{AbortHandle, JoinError};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use super::registry::JobHandler;

/// Error message recorded for a job aborted by [`JobSupervisor::shutdown`].
pub const SHUTDOWN_CANCEL_MESSAGE: &str = "Job cancelled during shutdown";

/// Error message recorded for a job aborted by [`JobSupervisor::cancel`].
pub const CANCEL_MESSAGE: &str = "Job cancelled";

/// Error message recorded for a job whose handler returned without leaving
/// it `done` or `error`.
pub const UNFINISHED_MESSAGE: &str = "Job handler returned without finishing the job";

/// Tracks, joins, and cancels background job tasks.
pub struct JobSupervisor {
    jobs: Arc<dyn JobStore>,
    tracker: TaskTracker,
    shutdown: CancellationToken,
    running: Arc<Mutex<HashMap<DbId, AbortHandle>>>,
}

impl JobSupervisor {
    pub fn new(jobs: Arc<dyn JobStore>) -> Self {
        Self {
            jobs,
            tracker: TaskTracker::new(),
            shutdown: CancellationToken::new(),
            running: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Run `handler` for `job_id` in the background.
    pub fn spawn(&self, job_id: DbId, handler: Arc<dyn JobHandler>) {
        let task = tokio::spawn(async move { handler.run(job_id).await });
        lock(&self.running).insert(job_id, task.abort_handle());

        let jobs = Arc::clone(&self.jobs);
        let running = Arc::clone(&self.running);
        let shutdown = self.shutdown.clone();

        self.tracker.spawn(async move {
            let mut task = task;
            let result = tokio::select! {
                result = &mut task => result,
                _ = shutdown.cancelled() => {
                    task.abort();
                    task.await
                }
            };
            lock(&running).remove(&job_id);

            match result {
                Ok(()) => {
                    tracing::debug!(job_id, "Job task finished");
                    finalize_as_error(jobs.as_ref(), job_id, UNFINISHED_MESSAGE, false).await;
                }
                Err(join_err) => {
                    let message = failure_message(join_err, shutdown.is_cancelled());
                    tracing::error!(job_id, error = %message, "Job task did not finish normally");
                    finalize_as_error(jobs.as_ref(), job_id, &message, true).await;
                }
            }
        });
    }

    /// Abort the task running `job_id`. Returns `false` if no such task is running.
    pub fn cancel(&self, job_id: DbId) -> bool {
        match lock(&self.running).get(&job_id) {
            Some(handle) => {
                handle.abort();
                tracing::info!(job_id, "Job cancellation requested");
                true
            }
            None => false,
        }
    }

    /// Number of job tasks that have not finished yet.
    pub fn running_count(&self) -> usize {
        lock(&self.running).len()
    }

    /// Wait until every job spawned so far, including its finalization, is done.
    pub async fn join_all(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }

    /// Give running jobs up to `grace` to finish, then cancel the rest and
    /// wait for them to be finalized.
    pub async fn shutdown(&self, grace: Duration) {
        self.tracker.close();
        let running = self.running_count();
        if running > 0 {
            tracing::info!(running, grace_secs = grace.as_secs(), "Waiting for running jobs");
        }

        if tokio::time::timeout(grace, self.tracker.wait()).await.is_err() {
            tracing::warn!(
                remaining = self.running_count(),
                "Jobs still running after grace period, cancelling"
            );
            self.shutdown.cancel();
            self.tracker.wait().await;
        }
    }
}

fn lock(map: &Mutex<HashMap<DbId, AbortHandle>>) -> MutexGuard<'_, HashMap<DbId, AbortHandle>> {
    map.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn failure_message(err: JoinError, during_shutdown: bool) -> String {
    if err.is_panic() {
        format!("Job panicked: {}", panic_detail(err.into_panic()))
    } else if during_shutdown {
        SHUTDOWN_CANCEL_MESSAGE.to_string()
    } else {
        CANCEL_MESSAGE.to_string()
    }
}

fn panic_detail(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Mark the job `error` unless it already reached a terminal status.
///
/// When the current status cannot be read, the write only happens if
/// `if_unreadable` is set.
async fn finalize_as_error(
    jobs: &dyn JobStore,
    job_id: DbId,
    message: &str,
    if_unreadable: bool,
) {
    let current = match jobs.find_by_id(job_id).await {
        Ok(Some(job)) => job.status(),
        Ok(None) => {
            tracing::warn!(job_id, "Job row vanished before it could be finalized");
            return;
        }
        Err(e) => {
            tracing::error!(job_id, error = %e, "Failed to load job for finalization");
            if !if_unreadable {
                return;
            }
            None
        }
    };

    if current.is_some_and(AsyncJobStatus::is_terminal) {
        return;
    }

    tracing::warn!(job_id, status = ?current, reason = message, "Finalizing job as error");
    if let Err(e) = jobs
        .update_status(job_id, AsyncJobStatus::Error, Some(message))
        .await
    {
        tracing::error!(job_id, error = %e, "Failed to mark job as error");
    }
}
