use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::response::Envelope;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("Invalid POST Payload")]
    InvalidPayload,

    #[error("Invalid JSON Keys")]
    InvalidKeys,

    #[error("Username and email are required")]
    InvalidForm,

    #[error("Email already in use")]
    EmailInUse,

    #[error("User does not exist")]
    NotFound,

    /// The insert lost a race against the email unique constraint.
    #[error("Unknown database error")]
    UnknownDatabase,

    #[error("Database error: {0}")]
    Internal(#[source] sqlx::Error),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

impl From<StoreError> for UserError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => UserError::UnknownDatabase,
            StoreError::Database(e) => UserError::Internal(e),
        }
    }
}

impl UserError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            UserError::Internal(_) | UserError::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
            // Missing users are reported as 400, not 404.
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// Text shown to the client; internal failures are not described.
    pub fn public_message(&self) -> String {
        match self {
            UserError::Internal(e) => {
                tracing::error!("Database error: {:?}", e);
                "Internal server error".to_string()
            }
            UserError::Template(e) => {
                tracing::error!("Template rendering failed: {:?}", e);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        Envelope::failure(self.public_message()).with_status(status)
    }
}
