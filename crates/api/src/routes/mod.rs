pub mod async_jobs;
pub mod health;
