use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::application::ApplicationStatus;
use crate::models::vacancy::VacancyStatus;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BulkStatusPayload<S> {
    #[validate(length(min = 1, max = 500))]
    pub ids: Vec<Uuid>,
    pub status: S,
}

pub type BulkVacancyStatusPayload = BulkStatusPayload<VacancyStatus>;
pub type BulkApplicationStatusPayload = BulkStatusPayload<ApplicationStatus>;
