//! Exercise entity model and the insert DTO produced by the catalog import.

use fitness_core::catalog::{decode_list, encode_list, non_empty, CatalogItem};
use fitness_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `exercises` table.
///
/// List-valued columns hold JSON-encoded string arrays.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: DbId,
    pub name: String,
    pub total_weight_multiplier: f32,
    pub external_id: Option<String>,
    pub force: Option<String>,
    pub level: Option<String>,
    pub mechanic: Option<String>,
    pub equipment: Option<String>,
    pub category: Option<String>,
    pub primary_muscles: Option<String>,
    pub secondary_muscles: Option<String>,
    pub instructions: Option<String>,
    pub images: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Exercise {
    /// Local image paths stored for this exercise.
    pub fn image_paths(&self) -> Result<Vec<String>, serde_json::Error> {
        decode_list(self.images.as_deref())
    }
}

/// Insert DTO for an exercise derived from a catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateExercise {
    pub name: String,
    pub external_id: String,
    pub force: Option<String>,
    pub level: Option<String>,
    pub mechanic: Option<String>,
    pub equipment: Option<String>,
    pub category: Option<String>,
    pub primary_muscles: String,
    pub secondary_muscles: String,
    pub instructions: String,
    pub images: String,
}

impl CreateExercise {
    /// Build the stored form of a catalog entry.
    ///
    /// `local_images` are the public paths of the images that made it into
    /// the cache; the entry's own `images` list is not used.
    pub fn from_catalog_item(
        item: &CatalogItem,
        local_images: &[String],
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            name: item.name.clone(),
            external_id: item.external_id.clone(),
            force: item.force.clone(),
            level: non_empty(item.level.as_deref()),
            mechanic: item.mechanic.clone(),
            equipment: item.equipment.clone(),
            category: non_empty(item.category.as_deref()),
            primary_muscles: encode_list(&item.primary_muscles)?,
            secondary_muscles: encode_list(&item.secondary_muscles)?,
            instructions: encode_list(&item.instructions)?,
            images: encode_list(local_images)?,
        })
    }
}
