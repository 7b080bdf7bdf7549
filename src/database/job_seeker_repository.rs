use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::job_seeker_dto::JobSeekerPayload;
use crate::error::Result;
use crate::models::job_seeker::JobSeeker;

const JOB_SEEKER_COLUMNS: &str =
    "id, owner_id, name, email, phone, profession, location, notes, created_at, updated_at";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobSeekerRepository: Send + Sync {
    async fn insert(&self, owner_id: Uuid, payload: &JobSeekerPayload) -> Result<JobSeeker>;
    async fn update(&self, id: Uuid, payload: &JobSeekerPayload) -> Result<JobSeeker>;
    async fn find(&self, id: Uuid) -> Result<Option<JobSeeker>>;
    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<JobSeeker>>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[derive(Clone)]
pub struct PgJobSeekerRepository {
    pool: PgPool,
}

impl PgJobSeekerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobSeekerRepository for PgJobSeekerRepository {
    async fn insert(&self, owner_id: Uuid, payload: &JobSeekerPayload) -> Result<JobSeeker> {
        let query = format!(
            r#"
            INSERT INTO job_seekers (owner_id, name, email, phone, profession, location, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            JOB_SEEKER_COLUMNS
        );
        let row = sqlx::query_as::<_, JobSeeker>(&query)
            .bind(owner_id)
            .bind(&payload.name)
            .bind(&payload.email)
            .bind(&payload.phone)
            .bind(&payload.profession)
            .bind(&payload.location)
            .bind(&payload.notes)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update(&self, id: Uuid, payload: &JobSeekerPayload) -> Result<JobSeeker> {
        let query = format!(
            r#"
            UPDATE job_seekers
            SET name = $2, email = $3, phone = $4, profession = $5, location = $6,
                notes = $7, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            JOB_SEEKER_COLUMNS
        );
        let row = sqlx::query_as::<_, JobSeeker>(&query)
            .bind(id)
            .bind(&payload.name)
            .bind(&payload.email)
            .bind(&payload.phone)
            .bind(&payload.profession)
            .bind(&payload.location)
            .bind(&payload.notes)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find(&self, id: Uuid) -> Result<Option<JobSeeker>> {
        let query = format!("SELECT {} FROM job_seekers WHERE id = $1", JOB_SEEKER_COLUMNS);
        let row = sqlx::query_as::<_, JobSeeker>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<JobSeeker>> {
        let query = format!(
            "SELECT {} FROM job_seekers WHERE owner_id = $1 ORDER BY name ASC",
            JOB_SEEKER_COLUMNS
        );
        let rows = sqlx::query_as::<_, JobSeeker>(&query)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM job_seekers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
