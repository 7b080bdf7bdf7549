use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::vacancy_dto::{CreateVacancyPayload, UpdateVacancyPayload, VacancyListQuery};
use crate::error::Result;
use crate::models::vacancy::{Vacancy, VacancyStatus};

const VACANCY_COLUMNS: &str = "id, title, company, location, employment_type, salary_from, \
     salary_to, currency, description, requirements, contact_email, status, posted_by, \
     poster_email, created_at, updated_at";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VacancyRepository: Send + Sync {
    async fn insert(
        &self,
        posted_by: Uuid,
        poster_email: Option<String>,
        payload: &CreateVacancyPayload,
    ) -> Result<Vacancy>;
    async fn update(&self, id: Uuid, payload: &UpdateVacancyPayload) -> Result<Vacancy>;
    async fn find(&self, id: Uuid) -> Result<Option<Vacancy>>;
    /// One page of matching vacancies plus the total match count.
    async fn list(
        &self,
        query: &VacancyListQuery,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Vacancy>, i64)>;
    async fn list_approved(&self, limit: i64) -> Result<Vec<Vacancy>>;
    async fn set_status(&self, id: Uuid, status: VacancyStatus) -> Result<Vacancy>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[derive(Clone)]
pub struct PgVacancyRepository {
    pool: PgPool,
}

impl PgVacancyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VacancyRepository for PgVacancyRepository {
    async fn insert(
        &self,
        posted_by: Uuid,
        poster_email: Option<String>,
        payload: &CreateVacancyPayload,
    ) -> Result<Vacancy> {
        let query = format!(
            r#"
            INSERT INTO vacancies (
                title, company, location, employment_type,
                salary_from, salary_to, currency, description, requirements,
                contact_email, status, posted_by, poster_email
            ) VALUES (
                $1, $2, $3, $4,
                $5, $6, $7, $8, $9,
                $10, 'pending', $11, $12
            )
            RETURNING {}
            "#,
            VACANCY_COLUMNS
        );
        let vacancy = sqlx::query_as::<_, Vacancy>(&query)
            .bind(&payload.title)
            .bind(&payload.company)
            .bind(&payload.location)
            .bind(&payload.employment_type)
            .bind(payload.salary_from)
            .bind(payload.salary_to)
            .bind(&payload.currency)
            .bind(&payload.description)
            .bind(&payload.requirements)
            .bind(&payload.contact_email)
            .bind(posted_by)
            .bind(poster_email)
            .fetch_one(&self.pool)
            .await?;
        Ok(vacancy)
    }

    async fn update(&self, id: Uuid, payload: &UpdateVacancyPayload) -> Result<Vacancy> {
        let query = format!(
            r#"
            UPDATE vacancies
            SET
                title = COALESCE($2, title),
                company = COALESCE($3, company),
                location = COALESCE($4, location),
                employment_type = COALESCE($5, employment_type),
                salary_from = COALESCE($6, salary_from),
                salary_to = COALESCE($7, salary_to),
                currency = COALESCE($8, currency),
                description = COALESCE($9, description),
                requirements = COALESCE($10, requirements),
                contact_email = COALESCE($11, contact_email),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            VACANCY_COLUMNS
        );
        let vacancy = sqlx::query_as::<_, Vacancy>(&query)
            .bind(id)
            .bind(&payload.title)
            .bind(&payload.company)
            .bind(&payload.location)
            .bind(&payload.employment_type)
            .bind(payload.salary_from)
            .bind(payload.salary_to)
            .bind(&payload.currency)
            .bind(&payload.description)
            .bind(&payload.requirements)
            .bind(&payload.contact_email)
            .fetch_one(&self.pool)
            .await?;
        Ok(vacancy)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Vacancy>> {
        let query = format!("SELECT {} FROM vacancies WHERE id = $1", VACANCY_COLUMNS);
        let vacancy = sqlx::query_as::<_, Vacancy>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(vacancy)
    }

    async fn list(
        &self,
        query: &VacancyListQuery,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Vacancy>, i64)> {
        let mut filters = Vec::new();
        let mut args: Vec<String> = Vec::new();

        if let Some(status) = query.status {
            filters.push(format!("status = ${}", args.len() + 1));
            args.push(status.as_str().to_string());
        }
        if let Some(company) = &query.company {
            filters.push(format!("company ILIKE ${}", args.len() + 1));
            args.push(format!("%{}%", company));
        }
        if let Some(search) = &query.search {
            let first = args.len() + 1;
            let second = first + 1;
            filters.push(format!(
                "(title ILIKE ${} OR location ILIKE ${})",
                first, second
            ));
            args.push(format!("%{}%", search));
            args.push(format!("%{}%", search));
        }

        let where_clause = if filters.is_empty() {
            "".to_string()
        } else {
            format!("WHERE {}", filters.join(" AND "))
        };

        let items_query = format!(
            "SELECT {} FROM vacancies {} ORDER BY created_at DESC LIMIT ${} OFFSET ${}",
            VACANCY_COLUMNS,
            where_clause,
            args.len() + 1,
            args.len() + 2
        );
        let total_query = format!("SELECT COUNT(*) FROM vacancies {}", where_clause);

        let mut items_statement = sqlx::query_as::<_, Vacancy>(&items_query);
        for value in &args {
            items_statement = items_statement.bind(value);
        }
        let items = items_statement
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        let mut total_statement = sqlx::query_scalar::<_, i64>(&total_query);
        for value in &args {
            total_statement = total_statement.bind(value);
        }
        let total = total_statement.fetch_one(&self.pool).await?;

        Ok((items, total))
    }

    async fn list_approved(&self, limit: i64) -> Result<Vec<Vacancy>> {
        let query = format!(
            r#"
            SELECT {}
            FROM vacancies
            WHERE status = 'approved'
            ORDER BY created_at DESC
            LIMIT $1
            "#,
            VACANCY_COLUMNS
        );
        let items = sqlx::query_as::<_, Vacancy>(&query)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    async fn set_status(&self, id: Uuid, status: VacancyStatus) -> Result<Vacancy> {
        let query = format!(
            "UPDATE vacancies SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            VACANCY_COLUMNS
        );
        let vacancy = sqlx::query_as::<_, Vacancy>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(vacancy)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM vacancies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
