use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ActivityLog {
    pub id: Uuid,
    pub actor_id: Option<Uuid>,
    pub actor_name: Option<String>,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Uuid,
    pub previous_status: Option<String>,
    pub new_status: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActivity {
    pub actor_id: Option<Uuid>,
    pub actor_name: Option<String>,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Uuid,
    pub previous_status: Option<String>,
    pub new_status: Option<String>,
}

impl NewActivity {
    pub fn new(action: &str, entity_type: &str, entity_id: Uuid) -> Self {
        Self {
            actor_id: None,
            actor_name: None,
            action: action.to_string(),
            entity_type: entity_type.to_string(),
            entity_id,
            previous_status: None,
            new_status: None,
        }
    }

    pub fn by(mut self, actor_id: Uuid, actor_name: Option<String>) -> Self {
        self.actor_id = Some(actor_id);
        self.actor_name = actor_name;
        self
    }

    pub fn transition(self, previous: &str, new: &str) -> Self {
        self.with_previous_status(previous).with_new_status(new)
    }

    pub fn with_previous_status(mut self, previous: &str) -> Self {
        self.previous_status = Some(previous.to_string());
        self
    }

    pub fn with_new_status(mut self, new: &str) -> Self {
        self.new_status = Some(new.to_string());
        self
    }
}
