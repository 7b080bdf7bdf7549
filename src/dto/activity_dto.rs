use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_ACTIVITY_LIMIT: i64 = 100;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ActivityLogQuery {
    pub entity_type: Option<String>,
    pub entity_id: Option<Uuid>,
    pub limit: Option<i64>,
}

impl ActivityLogQuery {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_ACTIVITY_LIMIT).clamp(1, 500)
    }
}
