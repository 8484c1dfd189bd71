//! Client for the external exercise catalog and the local image cache
//! built on top of it.

pub mod cache;
pub mod client;

pub use cache::{AssetCache, AssetCacheError, CacheOutcome};
pub use client::{CatalogClient, CatalogError};
