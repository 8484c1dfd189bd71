//! Domain types and pure helpers shared by every crate in the workspace.
//!
//! Nothing in here touches the network, the filesystem, or the database.

pub mod async_job;
pub mod catalog;
pub mod error;
pub mod types;
