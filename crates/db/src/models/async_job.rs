//! Async job entity model and request DTO.

use fitness_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize, Serializer};
use sqlx::FromRow;
use validator::Validate;

use super::status::{AsyncJobStatus, StatusId};

/// A row from the `async_jobs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AsyncJob {
    pub id: DbId,
    #[serde(rename = "type")]
    pub job_type: String,
    #[serde(rename = "status", serialize_with = "serialize_status_id")]
    pub status_id: StatusId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl AsyncJob {
    /// Decoded lifecycle status. `None` only if the row holds an unseeded id.
    pub fn status(&self) -> Option<AsyncJobStatus> {
        AsyncJobStatus::from_id(self.status_id)
    }
}

fn serialize_status_id<S: Serializer>(id: &StatusId, serializer: S) -> Result<S::Ok, S::Error> {
    match AsyncJobStatus::from_id(*id) {
        Some(status) => status.serialize(serializer),
        None => serializer.serialize_i16(*id),
    }
}

/// DTO for `POST /async-jobs`.
///
/// `type` is optional at the decoding layer so a missing field surfaces as a
/// validation error rather than a body-parsing error.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAsyncJob {
    #[serde(rename = "type", default)]
    #[validate(
        required(message = "type is required"),
        length(min = 1, message = "type must not be empty")
    )]
    pub job_type: Option<String>,
}
