use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::application_dto::ApplicationListQuery;
use crate::error::{Error, Result};
use crate::models::application::{Application, ApplicationStatus, NewApplication};

/// Postgres `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

const APPLICATION_COLUMNS: &str = "id, vacancy_id, applicant_id, applicant_email, cv_id, \
     cover_letter, status, created_at, updated_at";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    async fn insert(&self, application: &NewApplication) -> Result<Application>;
    async fn find(&self, id: Uuid) -> Result<Option<Application>>;
    async fn find_for(&self, vacancy_id: Uuid, applicant_id: Uuid) -> Result<Option<Application>>;
    async fn list(&self, query: &ApplicationListQuery) -> Result<Vec<Application>>;
    async fn set_status(&self, id: Uuid, status: ApplicationStatus) -> Result<Application>;
}

#[derive(Clone)]
pub struct PgApplicationRepository {
    pool: PgPool,
}

impl PgApplicationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApplicationRepository for PgApplicationRepository {
    async fn insert(&self, application: &NewApplication) -> Result<Application> {
        let query = format!(
            r#"
            INSERT INTO applications (vacancy_id, applicant_id, applicant_email, cv_id, cover_letter, status)
            VALUES ($1, $2, $3, $4, $5, 'pending')
            RETURNING {}
            "#,
            APPLICATION_COLUMNS
        );
        let row = sqlx::query_as::<_, Application>(&query)
            .bind(application.vacancy_id)
            .bind(application.applicant_id)
            .bind(&application.applicant_email)
            .bind(application.cv_id)
            .bind(&application.cover_letter)
            .fetch_one(&self.pool)
            .await
            .map_err(duplicate_as_conflict)?;
        Ok(row)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Application>> {
        let query = format!("SELECT {} FROM applications WHERE id = $1", APPLICATION_COLUMNS);
        let row = sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_for(&self, vacancy_id: Uuid, applicant_id: Uuid) -> Result<Option<Application>> {
        let query = format!(
            "SELECT {} FROM applications WHERE vacancy_id = $1 AND applicant_id = $2",
            APPLICATION_COLUMNS
        );
        let row = sqlx::query_as::<_, Application>(&query)
            .bind(vacancy_id)
            .bind(applicant_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list(&self, query: &ApplicationListQuery) -> Result<Vec<Application>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM applications
            WHERE ($1::uuid IS NULL OR vacancy_id = $1)
              AND ($2::uuid IS NULL OR applicant_id = $2)
              AND ($3::text IS NULL OR status = $3)
            ORDER BY created_at DESC
            "#,
            APPLICATION_COLUMNS
        );
        let rows = sqlx::query_as::<_, Application>(&sql)
            .bind(query.vacancy_id)
            .bind(query.applicant_id)
            .bind(query.status.map(|s| s.as_str()))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn set_status(&self, id: Uuid, status: ApplicationStatus) -> Result<Application> {
        let query = format!(
            "UPDATE applications SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            APPLICATION_COLUMNS
        );
        let row = sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }
}

/// A concurrent apply can slip past the `find_for` check; the table's
/// `UNIQUE (vacancy_id, applicant_id)` constraint then decides.
fn duplicate_as_conflict(err: sqlx::Error) -> Error {
    let duplicate = err
        .as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == UNIQUE_VIOLATION);
    if duplicate {
        Error::Conflict("You have already applied to this vacancy".to_string())
    } else {
        Error::from(err)
    }
}
