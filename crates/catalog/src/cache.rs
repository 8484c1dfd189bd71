//! Local disk cache for catalog images.
//!
//! A file's presence at its destination path is the whole cache state: if
//! it exists it is never fetched again. Downloads land in a temporary
//! sibling first and are renamed into place, so an interrupted write never
//! leaves a partial file behind that would later look cached.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fitness_core::catalog::{resolve_image, ImageLocation};
use fitness_core::error::CoreError;
use tokio::io::AsyncWriteExt;

use crate::client::{CatalogClient, CatalogError};

/// Errors from caching a single image.
#[derive(Debug, thiserror::Error)]
pub enum AssetCacheError {
    #[error(transparent)]
    Fetch(#[from] CatalogError),

    #[error("Failed to create directory {}: {source}", path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("Failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// What [`AssetCache::ensure_local`] had to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    /// The file was already on disk; nothing was fetched.
    AlreadyCached,
    /// The file was downloaded; `bytes` were written.
    Downloaded { bytes: u64 },
}

/// Idempotent image cache rooted at a local directory.
pub struct AssetCache {
    client: Arc<CatalogClient>,
    root: PathBuf,
}

impl AssetCache {
    pub fn new(client: Arc<CatalogClient>, root: impl Into<PathBuf>) -> Self {
        Self {
            client,
            root: root.into(),
        }
    }

    /// Map a catalog-relative image path to its remote URL, cache path, and
    /// public path.
    pub fn locate(&self, relative: &str) -> Result<ImageLocation, CoreError> {
        resolve_image(relative, self.client.image_base_url(), &self.root)
    }

    /// Make sure `local_path` holds the image at `remote_url`.
    ///
    /// Returns immediately, without network access, if the file exists.
    pub async fn ensure_local(
        &self,
        remote_url: &str,
        local_path: &Path,
    ) -> Result<CacheOutcome, AssetCacheError> {
        if tokio::fs::try_exists(local_path).await.unwrap_or(false) {
            return Ok(CacheOutcome::AlreadyCached);
        }

        if let Some(parent) = local_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| AssetCacheError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        let response = self.client.open_image(remote_url).await?;

        let temp_path = temp_path_for(local_path);
        let bytes = match write_body(response, &temp_path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                let _ = tokio::fs::remove_file(&temp_path).await;
                return Err(e);
            }
        };

        if let Err(source) = tokio::fs::rename(&temp_path, local_path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(AssetCacheError::Write {
                path: local_path.to_path_buf(),
                source,
            });
        }

        tracing::debug!(url = remote_url, path = %local_path.display(), bytes, "Cached image");
        Ok(CacheOutcome::Downloaded { bytes })
    }
}

/// Unique hidden sibling of `path` used while downloading.
fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{file_name}.{}.part", uuid::Uuid::new_v4()))
}

async fn write_body(mut response: reqwest::Response, path: &Path) -> Result<u64, AssetCacheError> {
    let write_err = |source| AssetCacheError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut file = tokio::fs::File::create(path).await.map_err(write_err)?;
    let mut written: u64 = 0;

    while let Some(chunk) = response.chunk().await.map_err(CatalogError::from)? {
        file.write_all(&chunk).await.map_err(write_err)?;
        written += chunk.len() as u64;
    }

    file.flush().await.map_err(write_err)?;
    Ok(written)
}
