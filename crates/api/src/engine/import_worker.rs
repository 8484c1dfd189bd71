//! The catalog import job.
//!
//! One run fetches the whole catalog, skips entries whose external id is
//! already stored, caches each entry's images, and inserts the remaining
//! entries in one batch. Image failures only drop the image; a failed fetch
//! or batch insert fails the job.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use fitness_catalog::{AssetCache, CacheOutcome, CatalogClient, CatalogError};
use fitness_core::async_job::ImportSummary;
use fitness_core::catalog::CatalogItem;
use fitness_core::types::DbId;
use fitness_db::models::exercise::CreateExercise;
use fitness_db::models::status::AsyncJobStatus;
use fitness_db::store::{ExerciseStore, JobStore};

use super::registry::JobHandler;

/// Errors that end an import run.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// Catalog download or decode failed.
    #[error(transparent)]
    Fetch(#[from] CatalogError),

    /// The batch insert failed.
    #[error("Database error: {0}")]
    Persistence(sqlx::Error),

    /// The job row could not be updated.
    #[error("Failed to update job status: {0}")]
    Status(sqlx::Error),

    #[error("Invalid job status transition: {from} -> {to}")]
    InvalidTransition {
        from: AsyncJobStatus,
        to: AsyncJobStatus,
    },
}

/// Runs [`JobType::FetchCatalog`](fitness_core::async_job::JobType::FetchCatalog) jobs.
pub struct CatalogImportWorker {
    jobs: Arc<dyn JobStore>,
    exercises: Arc<dyn ExerciseStore>,
    client: Arc<CatalogClient>,
    cache: Arc<AssetCache>,
}

impl CatalogImportWorker {
    pub fn new(
        jobs: Arc<dyn JobStore>,
        exercises: Arc<dyn ExerciseStore>,
        client: Arc<CatalogClient>,
        cache: Arc<AssetCache>,
    ) -> Self {
        Self {
            jobs,
            exercises,
            client,
            cache,
        }
    }

    /// Run the import for `job_id`, moving it from `pending` through
    /// `running` to `done` or `error`.
    ///
    /// Any failure, including a failed status write, ends with one attempt
    /// to record `error` on the job.
    pub async fn execute(&self, job_id: DbId) -> Result<ImportSummary, ImportError> {
        let mut lifecycle = Lifecycle::new(self.jobs.as_ref(), job_id);

        let result = self.run_to_completion(&mut lifecycle, job_id).await;
        if let Err(err) = &result {
            let message = err.to_string();
            tracing::error!(job_id, error = %message, "Catalog import failed");
            if let Err(status_err) = lifecycle
                .advance(AsyncJobStatus::Error, Some(&message))
                .await
            {
                tracing::error!(job_id, error = %status_err, "Failed to record import failure");
            }
        }
        result
    }

    async fn run_to_completion(
        &self,
        lifecycle: &mut Lifecycle<'_>,
        job_id: DbId,
    ) -> Result<ImportSummary, ImportError> {
        lifecycle.advance(AsyncJobStatus::Running, None).await?;
        tracing::info!(job_id, "Catalog import started");

        let summary = self.import(job_id).await?;
        lifecycle.advance(AsyncJobStatus::Done, None).await?;

        tracing::info!(
            job_id,
            total = summary.total,
            created = summary.created,
            skipped = summary.skipped,
            errors = summary.errors,
            images_downloaded = summary.images_downloaded,
            images_cached = summary.images_cached,
            image_errors = summary.image_errors,
            "Catalog import finished",
        );
        Ok(summary)
    }

    async fn import(&self, job_id: DbId) -> Result<ImportSummary, ImportError> {
        let items = self.client.fetch_catalog().await?;

        let mut summary = ImportSummary {
            total: items.len(),
            ..ImportSummary::default()
        };
        let mut seen: HashSet<&str> = HashSet::new();
        let mut batch: Vec<CreateExercise> = Vec::new();

        for item in &items {
            if !seen.insert(item.external_id.as_str()) {
                summary.skipped += 1;
                continue;
            }

            match self.exercises.exists_by_external_id(&item.external_id).await {
                Ok(true) => {
                    summary.skipped += 1;
                    continue;
                }
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(
                        job_id,
                        external_id = %item.external_id,
                        error = %e,
                        "Dedup lookup failed, skipping item",
                    );
                    summary.errors += 1;
                    continue;
                }
            }

            let images = self.cache_images(job_id, item, &mut summary).await;

            match CreateExercise::from_catalog_item(item, &images) {
                Ok(record) => batch.push(record),
                Err(e) => {
                    tracing::warn!(
                        job_id,
                        external_id = %item.external_id,
                        error = %e,
                        "Failed to convert catalog item",
                    );
                    summary.errors += 1;
                }
            }
        }

        summary.created = batch.len();
        if !batch.is_empty() {
            self.exercises
                .create_batch(&batch)
                .await
                .map_err(ImportError::Persistence)?;
        }

        Ok(summary)
    }

    /// Cache every image of `item`, returning the public paths of those now on disk.
    async fn cache_images(
        &self,
        job_id: DbId,
        item: &CatalogItem,
        summary: &mut ImportSummary,
    ) -> Vec<String> {
        let mut local = Vec::with_capacity(item.images.len());

        for relative in item.images.iter().filter(|p| !p.trim().is_empty()) {
            let location = match self.cache.locate(relative) {
                Ok(location) => location,
                Err(e) => {
                    tracing::warn!(
                        job_id,
                        external_id = %item.external_id,
                        image = %relative,
                        error = %e,
                        "Rejected image path",
                    );
                    summary.image_errors += 1;
                    continue;
                }
            };

            match self
                .cache
                .ensure_local(&location.remote_url, &location.local_path)
                .await
            {
                Ok(CacheOutcome::AlreadyCached) => summary.images_cached += 1,
                Ok(CacheOutcome::Downloaded { .. }) => summary.images_downloaded += 1,
                Err(e) => {
                    tracing::warn!(
                        job_id,
                        external_id = %item.external_id,
                        url = %location.remote_url,
                        error = %e,
                        "Failed to cache image",
                    );
                    summary.image_errors += 1;
                    continue;
                }
            }

            local.push(location.public_path);
        }

        local
    }
}

#[async_trait]
impl JobHandler for CatalogImportWorker {
    async fn run(&self, job_id: DbId) {
        // Failures are logged and recorded on the job row; the supervisor
        // closes the job if even the error write was lost.
        let _ = self.execute(job_id).await;
    }
}

/// Forward-only status tracker for one job.
struct Lifecycle<'a> {
    jobs: &'a dyn JobStore,
    job_id: DbId,
    current: AsyncJobStatus,
}

impl<'a> Lifecycle<'a> {
    fn new(jobs: &'a dyn JobStore, job_id: DbId) -> Self {
        Self {
            jobs,
            job_id,
            current: AsyncJobStatus::Pending,
        }
    }

    async fn advance(
        &mut self,
        next: AsyncJobStatus,
        error_message: Option<&str>,
    ) -> Result<(), ImportError> {
        if !self.current.can_transition_to(next) {
            return Err(ImportError::InvalidTransition {
                from: self.current,
                to: next,
            });
        }

        self.jobs
            .update_status(self.job_id, next, error_message)
            .await
            .map_err(ImportError::Status)?;
        tracing::debug!(job_id = self.job_id, from = %self.current, to = %next, "Job status changed");
        self.current = next;
        Ok(())
    }
}
