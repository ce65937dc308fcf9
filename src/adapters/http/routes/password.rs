use axum::{
    Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post,
};
use serde::{Deserialize, Serialize};

use crate::{adapters::http::app_state::AppState, app_error::AppResult};

#[derive(Deserialize)]
struct EmailPayload {
    #[serde(default)]
    email: String,
}

#[derive(Deserialize)]
struct ResetPayload {
    #[serde(default)]
    email: String,
    #[serde(default)]
    code: String,
    #[serde(default)]
    new_password: String,
}

#[derive(Serialize)]
struct MessageResponse {
    message: &'static str,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/password/forgot", post(request_code))
        .route("/password/resend", post(request_code))
        .route("/password/reset", post(reset))
}

/// POST /api/auth/password/forgot and /api/auth/password/resend
/// Both send the pending reset code if there is one.
async fn request_code(
    State(app_state): State<AppState>,
    Json(payload): Json<EmailPayload>,
) -> AppResult<impl IntoResponse> {
    app_state
        .password_reset_use_cases
        .request_code(&payload.email)
        .await?;
    Ok(StatusCode::ACCEPTED)
}

async fn reset(
    State(app_state): State<AppState>,
    Json(payload): Json<ResetPayload>,
) -> AppResult<impl IntoResponse> {
    app_state
        .password_reset_use_cases
        .submit_reset(&payload.email, &payload.code, &payload.new_password)
        .await?;
    Ok((
        StatusCode::OK,
        Json(MessageResponse {
            message: "Password has been reset.",
        }),
    ))
}
