mod async_job_repo;
mod exercise_repo;

pub use async_job_repo::AsyncJobRepo;
pub use exercise_repo::ExerciseRepo;
