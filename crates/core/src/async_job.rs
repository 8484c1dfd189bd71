//! Asynchronous job types and the per-run import summary.
//!
//! The set of job types is closed: a request naming anything outside
//! [`JobType::ALL`] is rejected before a job row exists.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::CoreError;

/// Wire name for the catalog import job.
pub const JOB_TYPE_FETCH_CATALOG: &str = "fetch-catalog";

/// Older wire name for the catalog import job, still accepted on input.
pub const JOB_TYPE_FETCH_EXERCISES_LEGACY: &str = "fetch-exercises";

/// Kind of background work a job performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobType {
    /// Import the external exercise catalog and cache its images.
    FetchCatalog,
}

impl JobType {
    /// Every job type the system knows how to run.
    pub const ALL: &'static [JobType] = &[JobType::FetchCatalog];

    /// Canonical wire/storage name.
    pub fn as_str(self) -> &'static str {
        match self {
            JobType::FetchCatalog => JOB_TYPE_FETCH_CATALOG,
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            JOB_TYPE_FETCH_CATALOG | JOB_TYPE_FETCH_EXERCISES_LEGACY => Ok(JobType::FetchCatalog),
            other => {
                let valid: Vec<&str> = JobType::ALL.iter().map(|t| t.as_str()).collect();
                Err(CoreError::Validation(format!(
                    "Unknown job type: '{other}'. Valid types: {}",
                    valid.join(", ")
                )))
            }
        }
    }
}

impl Serialize for JobType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Counters collected over one import run.
///
/// `created + skipped + errors == total` holds for every run that reaches
/// the persistence step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    /// Catalog items returned by the fetch.
    pub total: usize,
    /// Items converted and handed to the batch insert.
    pub created: usize,
    /// Items whose external id was already stored.
    pub skipped: usize,
    /// Items dropped because the dedup lookup or conversion failed.
    pub errors: usize,
    /// Images fetched over the network during this run.
    pub images_downloaded: usize,
    /// Images already present in the local cache.
    pub images_cached: usize,
    /// Images that could not be cached and were left out of their record.
    pub image_errors: usize,
}

impl ImportSummary {
    /// Number of items accounted for so far.
    pub fn processed(&self) -> usize {
        self.created + self.skipped + self.errors
    }
}
