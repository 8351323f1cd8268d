use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use tracing::instrument;

use super::{StoreError, UserStore};
use crate::models::user::{NewUser, UserModel};

#[derive(Clone, Debug)]
pub struct UserRepository {
    pool: Pool<Postgres>,
}

impl UserRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn insert_error(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &e
        && db_err.is_unique_violation()
    {
        tracing::warn!("Insert hit the email unique constraint");
        return StoreError::DuplicateEmail;
    }
    tracing::error!("Failed to execute query: {:?}", e);
    StoreError::Database(e)
}

#[async_trait]
impl UserStore for UserRepository {
    #[instrument(name = "Saving new user to database", skip(self))]
    async fn insert(&self, new_user: &NewUser) -> Result<UserModel, StoreError> {
        let user = sqlx::query_as::<_, UserModel>(
            r#"INSERT INTO users (username, email) VALUES ($1, $2)
            RETURNING id, username, email, created_at"#,
        )
        .bind(new_user.username())
        .bind(new_user.email())
        .fetch_one(&self.pool)
        .await
        .map_err(insert_error)?;
        Ok(user)
    }

    #[instrument(name = "Fetching user by id from database", skip(self))]
    async fn find_by_id(&self, id: i32) -> Result<Option<UserModel>, StoreError> {
        let user = sqlx::query_as::<_, UserModel>(
            r#"SELECT id, username, email, created_at FROM users WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch user: {:?}", e);
            e
        })?;
        Ok(user)
    }

    #[instrument(name = "Fetching user by email from database", skip(self))]
    async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>, StoreError> {
        let user = sqlx::query_as::<_, UserModel>(
            r#"SELECT id, username, email, created_at FROM users WHERE email = $1"#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch user: {:?}", e);
            e
        })?;
        Ok(user)
    }

    #[instrument(name = "Listing users from database", skip(self))]
    async fn list_all(&self) -> Result<Vec<UserModel>, StoreError> {
        let users = sqlx::query_as::<_, UserModel>(
            r#"SELECT id, username, email, created_at FROM users ORDER BY created_at, id"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }
}
