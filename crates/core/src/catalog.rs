//! External exercise catalog entries and the helpers that turn them into
//! storable values.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CoreError;

/// URL prefix under which cached images are served.
pub const LOCAL_IMAGE_PREFIX: &str = "/images";

/// One exercise description as published by the external catalog.
///
/// Only the structure is checked on decode; field contents are taken as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    #[serde(rename = "id")]
    pub external_id: String,
    pub name: String,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub force: Option<String>,
    #[serde(default)]
    pub mechanic: Option<String>,
    #[serde(default)]
    pub equipment: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub primary_muscles: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub secondary_muscles: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub instructions: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub images: Vec<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<String>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Where one catalog image lives remotely, on disk, and in API responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageLocation {
    pub remote_url: String,
    pub local_path: PathBuf,
    pub public_path: String,
}

/// Encode a list field into its stored form (a JSON array of strings).
pub fn encode_list(values: &[String]) -> Result<String, serde_json::Error> {
    serde_json::to_string(values)
}

/// Decode a stored list field. Missing or empty columns decode to an empty list.
pub fn decode_list(stored: Option<&str>) -> Result<Vec<String>, serde_json::Error> {
    match stored {
        Some(s) if !s.is_empty() => serde_json::from_str(s),
        _ => Ok(Vec::new()),
    }
}

/// Treat an empty or whitespace-only string as absent.
pub fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
}

/// Check that a catalog image path stays inside the cache directory.
///
/// Accepts only relative paths made of plain components (no `..`, no root,
/// no drive prefix).
pub fn validate_image_path(relative: &str) -> Result<(), CoreError> {
    if relative.trim().is_empty() {
        return Err(CoreError::Validation("Image path must not be empty".into()));
    }
    if relative.contains('\\') {
        return Err(CoreError::Validation(format!(
            "Image path must use forward slashes: '{relative}'"
        )));
    }
    let all_normal = Path::new(relative)
        .components()
        .all(|c| matches!(c, Component::Normal(_)));
    if !all_normal {
        return Err(CoreError::Validation(format!(
            "Image path must be relative and must not leave the cache directory: '{relative}'"
        )));
    }
    Ok(())
}

/// Resolve a catalog image path against the remote base URL and the local
/// cache directory.
pub fn resolve_image(
    relative: &str,
    remote_base: &str,
    cache_dir: &Path,
) -> Result<ImageLocation, CoreError> {
    validate_image_path(relative)?;
    Ok(ImageLocation {
        remote_url: format!("{}/{}", remote_base.trim_end_matches('/'), relative),
        local_path: cache_dir.join(relative),
        public_path: format!("{LOCAL_IMAGE_PREFIX}/{relative}"),
    })
}
