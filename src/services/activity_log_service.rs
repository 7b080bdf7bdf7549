use std::sync::Arc;
use tracing::warn;

use crate::database::activity_log_repository::ActivityLogRepository;
use crate::dto::activity_dto::ActivityLogQuery;
use crate::error::Result;
use crate::models::activity_log::{ActivityLog, NewActivity};

#[derive(Clone)]
pub struct ActivityLogService {
    repo: Arc<dyn ActivityLogRepository>,
}

impl ActivityLogService {
    pub fn new(repo: Arc<dyn ActivityLogRepository>) -> Self {
        Self { repo }
    }

    /// Appends an entry. Failures are logged and never reach the caller.
    pub async fn record(&self, entry: NewActivity) {
        if let Err(e) = self.repo.append(&entry).await {
            warn!(
                error = %e,
                action = %entry.action,
                entity_type = %entry.entity_type,
                entity_id = %entry.entity_id,
                "Failed to append activity log entry"
            );
        }
    }

    pub async fn list(&self, query: &ActivityLogQuery) -> Result<Vec<ActivityLog>> {
        self.repo.list(query).await
    }
}
