use std::sync::Arc;
use tracing::debug;

use crate::database::user_repository::UserRepository;
use crate::error::Result;
use crate::middleware::auth::CurrentUser;
use crate::models::user::User;

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    /// Syncs the caller's token identity into the local users table.
    pub async fn me(&self, actor: &CurrentUser) -> Result<User> {
        let user = self.repo.upsert(actor).await?;
        debug!(user_id = %user.id, "User profile synced");
        Ok(user)
    }

    pub async fn list(&self, actor: &CurrentUser) -> Result<Vec<User>> {
        actor.ensure_admin()?;
        self.repo.list().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::user_repository::MockUserRepository;
    use crate::error::Error;
    use chrono::Utc;
    use uuid::Uuid;

    fn current(role: &str) -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            email: Some("someone@example.com".into()),
            name: Some("Someone".into()),
            role: role.into(),
        }
    }

    #[tokio::test]
    async fn me_upserts_the_token_identity() {
        let actor = current("user");
        let id = actor.id;
        let mut repo = MockUserRepository::new();
        repo.expect_upsert()
            .withf(move |u| u.id == id)
            .times(1)
            .returning(|u| {
                Ok(User {
                    id: u.id,
                    name: u.name.clone(),
                    email: u.email.clone(),
                    role: u.role.clone(),
                    created_at: Utc::now(),
                    updated_at: Utc::now(),
                })
            });

        let user = UserService::new(Arc::new(repo)).me(&actor).await.unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.role, "user");
    }

    #[tokio::test]
    async fn listing_users_needs_an_admin() {
        let mut repo = MockUserRepository::new();
        repo.expect_list().times(0);
        let err = UserService::new(Arc::new(repo))
            .list(&current("user"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Forbidden(_)));
    }
}
