use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::Result;
use crate::middleware::auth::CurrentUser;
use crate::models::user::User;

const USER_COLUMNS: &str = "id, name, email, role, created_at, updated_at";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts the caller on first sight and refreshes name, email and role
    /// afterwards.
    async fn upsert(&self, user: &CurrentUser) -> Result<User>;
    async fn list(&self) -> Result<Vec<User>>;
}

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn upsert(&self, user: &CurrentUser) -> Result<User> {
        let query = format!(
            r#"
            INSERT INTO users (id, name, email, role)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE
            SET name = COALESCE(EXCLUDED.name, users.name),
                email = COALESCE(EXCLUDED.email, users.email),
                role = EXCLUDED.role,
                updated_at = NOW()
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        let row = sqlx::query_as::<_, User>(&query)
            .bind(user.id)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.role)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list(&self) -> Result<Vec<User>> {
        let query = format!("SELECT {} FROM users ORDER BY created_at DESC", USER_COLUMNS);
        let rows = sqlx::query_as::<_, User>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}
