//! Background job engine.
//!
//! Submitted jobs flow through the [`dispatcher`], which records them and
//! hands them to the [`supervisor`] to run the handler registered for their
//! type in the [`registry`]. The catalog import is the only handler today.

pub mod dispatcher;
pub mod import_worker;
pub mod registry;
pub mod supervisor;
