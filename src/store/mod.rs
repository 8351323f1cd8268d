pub mod schema;
pub mod user;

use async_trait::async_trait;

use crate::models::user::{NewUser, UserModel};

pub use user::UserRepository;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("a user with this email already exists")]
    DuplicateEmail,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Data access for the `users` table.
///
/// Handlers reach the store through `AppState`, never through a global.
#[async_trait]
pub trait UserStore: Send + Sync + std::fmt::Debug {
    /// Inserts a row; the database assigns `id` and `created_at`.
    async fn insert(&self, new_user: &NewUser) -> Result<UserModel, StoreError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<UserModel>, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>, StoreError>;

    /// Oldest first, ties broken by id.
    async fn list_all(&self) -> Result<Vec<UserModel>, StoreError>;
}
