//! Request handlers.
//!
//! Handlers stay thin: they extract and validate input, call into the job
//! engine or the stores on [`AppState`](crate::state::AppState), and map
//! errors via [`AppError`](crate::error::AppError).

pub mod async_jobs;
