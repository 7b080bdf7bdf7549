pub mod activity_log_service;
pub mod application_service;
pub mod bulk;
pub mod cv_service;
pub mod document_service;
pub mod extraction_service;
pub mod job_seeker_service;
pub mod notification_service;
pub mod user_service;
pub mod vacancy_service;
