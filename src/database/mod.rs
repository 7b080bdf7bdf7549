pub mod activity_log_repository;
pub mod application_repository;
pub mod cv_repository;
pub mod job_seeker_repository;
pub mod pool;
pub mod user_repository;
pub mod vacancy_repository;
