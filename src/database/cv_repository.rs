use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::cv::lifecycle::CvStatus;
use crate::error::Result;
use crate::models::cv::{Cv, CvWrite};

const CV_COLUMNS: &str = "id, user_id, job_title, status, executive_summary, data, ai_assisted, \
     source_job_seeker_id, created_at, updated_at, updated_by_name, updated_by_email";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CvRepository: Send + Sync {
    async fn insert(&self, owner_id: Uuid, write: &CvWrite) -> Result<Cv>;
    async fn update(&self, id: Uuid, write: &CvWrite) -> Result<Cv>;
    async fn find(&self, id: Uuid) -> Result<Option<Cv>>;
    async fn list_by_owner(&self, owner_id: Uuid, status: Option<CvStatus>) -> Result<Vec<Cv>>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[derive(Clone)]
pub struct PgCvRepository {
    pool: PgPool,
}

impl PgCvRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CvRepository for PgCvRepository {
    async fn insert(&self, owner_id: Uuid, write: &CvWrite) -> Result<Cv> {
        let query = format!(
            r#"
            INSERT INTO cvs (
                user_id, job_title, status, executive_summary, data, ai_assisted,
                source_job_seeker_id, updated_by_name, updated_by_email
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            CV_COLUMNS
        );
        let cv = sqlx::query_as::<_, Cv>(&query)
            .bind(owner_id)
            .bind(&write.data.job_title)
            .bind(write.status.as_str())
            .bind(&write.data.executive_summary)
            .bind(Json(&write.data))
            .bind(write.ai_assisted)
            .bind(write.source_job_seeker_id)
            .bind(&write.updated_by.name)
            .bind(&write.updated_by.email)
            .fetch_one(&self.pool)
            .await?;
        Ok(cv)
    }

    async fn update(&self, id: Uuid, write: &CvWrite) -> Result<Cv> {
        let query = format!(
            r#"
            UPDATE cvs
            SET
                job_title = $2,
                status = $3,
                executive_summary = $4,
                data = $5,
                ai_assisted = $6,
                source_job_seeker_id = $7,
                updated_by_name = $8,
                updated_by_email = $9,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            CV_COLUMNS
        );
        let cv = sqlx::query_as::<_, Cv>(&query)
            .bind(id)
            .bind(&write.data.job_title)
            .bind(write.status.as_str())
            .bind(&write.data.executive_summary)
            .bind(Json(&write.data))
            .bind(write.ai_assisted)
            .bind(write.source_job_seeker_id)
            .bind(&write.updated_by.name)
            .bind(&write.updated_by.email)
            .fetch_one(&self.pool)
            .await?;
        Ok(cv)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Cv>> {
        let query = format!("SELECT {} FROM cvs WHERE id = $1", CV_COLUMNS);
        let cv = sqlx::query_as::<_, Cv>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(cv)
    }

    async fn list_by_owner(&self, owner_id: Uuid, status: Option<CvStatus>) -> Result<Vec<Cv>> {
        let query = format!(
            r#"
            SELECT {}
            FROM cvs
            WHERE user_id = $1 AND ($2::text IS NULL OR status = $2)
            ORDER BY created_at DESC
            "#,
            CV_COLUMNS
        );
        let items = sqlx::query_as::<_, Cv>(&query)
            .bind(owner_id)
            .bind(status.map(|s| s.as_str()))
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM cvs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
