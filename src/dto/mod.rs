pub mod activity_dto;
pub mod application_dto;
pub mod bulk_dto;
pub mod cv_dto;
pub mod job_seeker_dto;
pub mod vacancy_dto;
