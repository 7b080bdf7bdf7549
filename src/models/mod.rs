pub mod activity_log;
pub mod application;
pub mod cv;
pub mod job_seeker;
pub mod user;
pub mod vacancy;
