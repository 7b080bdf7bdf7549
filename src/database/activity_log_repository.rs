use async_trait::async_trait;
use sqlx::PgPool;

use crate::dto::activity_dto::ActivityLogQuery;
use crate::error::Result;
use crate::models::activity_log::{ActivityLog, NewActivity};

const ACTIVITY_COLUMNS: &str = "id, actor_id, actor_name, action, entity_type, entity_id, \
     previous_status, new_status, created_at";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActivityLogRepository: Send + Sync {
    async fn append(&self, entry: &NewActivity) -> Result<ActivityLog>;
    async fn list(&self, query: &ActivityLogQuery) -> Result<Vec<ActivityLog>>;
}

#[derive(Clone)]
pub struct PgActivityLogRepository {
    pool: PgPool,
}

impl PgActivityLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityLogRepository for PgActivityLogRepository {
    async fn append(&self, entry: &NewActivity) -> Result<ActivityLog> {
        let query = format!(
            r#"
            INSERT INTO activity_logs (
                actor_id, actor_name, action, entity_type, entity_id, previous_status, new_status
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            ACTIVITY_COLUMNS
        );
        let row = sqlx::query_as::<_, ActivityLog>(&query)
            .bind(entry.actor_id)
            .bind(&entry.actor_name)
            .bind(&entry.action)
            .bind(&entry.entity_type)
            .bind(entry.entity_id)
            .bind(&entry.previous_status)
            .bind(&entry.new_status)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list(&self, query: &ActivityLogQuery) -> Result<Vec<ActivityLog>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM activity_logs
            WHERE ($1::text IS NULL OR entity_type = $1)
              AND ($2::uuid IS NULL OR entity_id = $2)
            ORDER BY created_at DESC
            LIMIT $3
            "#,
            ACTIVITY_COLUMNS
        );
        let rows = sqlx::query_as::<_, ActivityLog>(&sql)
            .bind(&query.entity_type)
            .bind(query.entity_id)
            .bind(query.limit())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}
