use axum::{
    Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post,
};
use serde::Deserialize;

use super::session::{AccountResponse, session_headers};
use crate::{adapters::http::app_state::AppState, app_error::AppResult};

#[derive(Deserialize)]
struct EmailPayload {
    #[serde(default)]
    email: String,
}

#[derive(Deserialize)]
struct SubmitCodePayload {
    #[serde(default)]
    email: String,
    #[serde(default)]
    code: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/verify", post(submit_code))
        .route("/verify/request", post(request_code))
        .route("/verify/resend", post(resend_code))
}

/// POST /api/auth/verify
/// A correct code verifies the account and starts a session.
async fn submit_code(
    State(app_state): State<AppState>,
    Json(payload): Json<SubmitCodePayload>,
) -> AppResult<impl IntoResponse> {
    let account = app_state
        .verification_use_cases
        .submit_code(&payload.email, &payload.code)
        .await?;
    let headers = session_headers(&app_state, account.id)?;
    Ok((StatusCode::OK, headers, Json(AccountResponse::from(account))))
}

/// POST /api/auth/verify/request
/// Re-sends the pending code, or a fresh one if none is pending.
async fn request_code(
    State(app_state): State<AppState>,
    Json(payload): Json<EmailPayload>,
) -> AppResult<impl IntoResponse> {
    app_state
        .verification_use_cases
        .request_code(&payload.email)
        .await?;
    Ok(StatusCode::ACCEPTED)
}

/// POST /api/auth/verify/resend
/// Replaces the pending code with a new one.
async fn resend_code(
    State(app_state): State<AppState>,
    Json(payload): Json<EmailPayload>,
) -> AppResult<impl IntoResponse> {
    app_state
        .verification_use_cases
        .resend_code(&payload.email)
        .await?;
    Ok(StatusCode::ACCEPTED)
}
