use axum::response::IntoResponse;

use crate::response::Envelope;

pub async fn ping() -> impl IntoResponse {
    Envelope::message("pong!")
}
