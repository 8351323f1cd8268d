use askama::Template;
use axum::{
    Form,
    extract::{State, rejection::FormRejection},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use crate::errors::UserError;
use crate::models::user::{NewUser, UserModel};
use crate::startup::AppState;

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    users: Vec<UserModel>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UserForm {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl UserForm {
    fn into_new_user(self) -> Option<NewUser> {
        NewUser::parse(self.username?, self.email?)
    }
}

async fn render(state: &AppState, error: Option<String>) -> Result<Html<String>, UserError> {
    let users = state.user_service.get_all().await?;
    Ok(Html(IndexTemplate { users, error }.render()?))
}

#[instrument(name = "Web: Index GET", skip(state))]
pub async fn index_page(State(state): State<AppState>) -> Result<impl IntoResponse, UserError> {
    render(&state, None).await
}

/// Goes through the same checks as `POST /users`; a rejected form re-renders
/// the page with the reason.
#[instrument(name = "Web: Index POST", skip(state, form))]
pub async fn index_post(
    State(state): State<AppState>,
    form: Result<Form<UserForm>, FormRejection>,
) -> Result<Response, UserError> {
    let new_user = match form {
        Ok(Form(form)) => form.into_new_user(),
        Err(rejection) => {
            tracing::warn!("Rejected form body: {}", rejection.body_text());
            None
        }
    };

    let result = match new_user {
        Some(new_user) => state.user_service.create(new_user).await.map(|_| ()),
        None => Err(UserError::InvalidForm),
    };

    match result {
        Ok(()) => Ok(Redirect::to("/").into_response()),
        Err(e) if e.status_code() == StatusCode::BAD_REQUEST => {
            let page = render(&state, Some(e.to_string())).await?;
            Ok((StatusCode::BAD_REQUEST, page).into_response())
        }
        Err(e) => Err(e),
    }
}
