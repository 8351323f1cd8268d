use std::sync::Arc;

use tracing::instrument;

use crate::errors::UserError;
use crate::models::user::{NewUser, UserModel};
use crate::store::UserStore;

#[derive(Clone, Debug)]
pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Rejects a taken email up front; the unique constraint still backs the
    /// check when two inserts race.
    #[instrument(name = "UserService: Create user", skip(self), fields(email = %new_user.email()))]
    pub async fn create(&self, new_user: NewUser) -> Result<UserModel, UserError> {
        if self.store.find_by_email(new_user.email()).await?.is_some() {
            tracing::warn!("Email already in use");
            return Err(UserError::EmailInUse);
        }

        let user = self.store.insert(&new_user).await?;
        tracing::info!(user_id = user.id, "User created");
        Ok(user)
    }

    /// `raw_id` comes straight from the path; anything that is not an `i32` is
    /// treated as a missing user.
    #[instrument(name = "UserService: Get user", skip(self))]
    pub async fn get_by_id(&self, raw_id: &str) -> Result<UserModel, UserError> {
        let id: i32 = raw_id.parse().map_err(|_| {
            tracing::warn!("Non-numeric user id");
            UserError::NotFound
        })?;

        self.store.find_by_id(id).await?.ok_or(UserError::NotFound)
    }

    pub async fn get_all(&self) -> Result<Vec<UserModel>, UserError> {
        Ok(self.store.list_all().await?)
    }
}
