//! Mapping from [`JobType`] to the code that runs it.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use fitness_core::async_job::JobType;
use fitness_core::types::DbId;

/// Executes one job to completion.
///
/// The handler owns the job's status from `running` onward and must leave it
/// terminal when it returns. The [`JobSupervisor`](super::supervisor::JobSupervisor)
/// finalizes a job as `error` after a panic, a cancellation, or a return that
/// left it unfinished.
#[async_trait]
pub trait JobHandler: Send + Sync {
    async fn run(&self, job_id: DbId);
}

/// Registered handlers, built once at startup.
#[derive(Default, Clone)]
pub struct HandlerRegistry {
    handlers: HashMap<JobType, Arc<dyn JobHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `job_type`, replacing any previous one.
    pub fn register(&mut self, job_type: JobType, handler: Arc<dyn JobHandler>) -> &mut Self {
        self.handlers.insert(job_type, handler);
        self
    }

    pub fn get(&self, job_type: JobType) -> Option<Arc<dyn JobHandler>> {
        self.handlers.get(&job_type).cloned()
    }

    /// Job types that can currently be submitted, in declaration order.
    pub fn job_types(&self) -> Vec<JobType> {
        JobType::ALL
            .iter()
            .copied()
            .filter(|t| self.handlers.contains_key(t))
            .collect()
    }
}
