use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use tracing::instrument;

use crate::errors::UserError;
use crate::models::user::{NewUser, UserDetail, UserList};
use crate::response::Envelope;
use crate::startup::AppState;

#[instrument(name = "HTTP: Get user", skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, UserError> {
    let user = state.user_service.get_by_id(&user_id).await?;
    Ok(Envelope::data(UserDetail::from(user)))
}

#[instrument(name = "HTTP: List users", skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse, UserError> {
    let users = state.user_service.get_all().await?;
    Ok(Envelope::data(UserList { users }))
}

#[instrument(name = "HTTP: Add user", skip(state, payload))]
pub async fn add_user(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, UserError> {
    let new_user = parse_payload(payload)?;
    let user = state.user_service.create(new_user).await?;

    Ok(Envelope::message(format!("{} added!", user.email)).with_status(StatusCode::CREATED))
}

/// An absent, unparseable, empty or non-object body is an invalid payload;
/// a usable object without non-empty string `username` and `email` has
/// invalid keys.
fn parse_payload(payload: Result<Json<Value>, JsonRejection>) -> Result<NewUser, UserError> {
    let fields = match payload {
        Ok(Json(Value::Object(fields))) if !fields.is_empty() => fields,
        Ok(_) => return Err(UserError::InvalidPayload),
        Err(rejection) => {
            tracing::warn!("Rejected JSON body: {}", rejection.body_text());
            return Err(UserError::InvalidPayload);
        }
    };

    let field = |key: &str| fields.get(key).and_then(Value::as_str).map(str::to_owned);
    match (field("username"), field("email")) {
        (Some(username), Some(email)) => {
            NewUser::parse(username, email).ok_or(UserError::InvalidKeys)
        }
        _ => Err(UserError::InvalidKeys),
    }
}
