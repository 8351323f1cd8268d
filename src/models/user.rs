use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct UserModel {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Fields required to insert a user; both are non-empty once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    username: String,
    email: String,
}

impl NewUser {
    pub fn parse(username: String, email: String) -> Option<Self> {
        if username.is_empty() || email.is_empty() {
            return None;
        }
        Some(Self { username, email })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

/// `GET /users/{id}` payload.
#[derive(Debug, Serialize)]
pub struct UserDetail {
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserModel> for UserDetail {
    fn from(user: UserModel) -> Self {
        Self {
            username: user.username,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

/// `GET /users` payload.
#[derive(Debug, Serialize)]
pub struct UserList {
    pub users: Vec<UserModel>,
}
