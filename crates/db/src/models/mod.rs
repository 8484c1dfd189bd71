pub mod async_job;
pub mod exercise;
pub mod status;
