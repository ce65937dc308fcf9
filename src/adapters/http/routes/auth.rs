use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use super::session::{
    AccountResponse, cleared_session_headers, current_account_id, session_headers,
};
use crate::{
    adapters::http::app_state::AppState,
    app_error::{AppError, AppResult},
};

#[derive(Deserialize)]
struct RegisterPayload {
    #[serde(default)]
    email: String,
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[derive(Deserialize)]
struct LoginPayload {
    #[serde(default, alias = "email", alias = "username")]
    username_or_email: String,
    #[serde(default)]
    password: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
}

/// POST /api/auth/register
/// Creates an unverified account and mails its first verification code.
async fn register(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> AppResult<impl IntoResponse> {
    let account = app_state
        .account_use_cases
        .register(&payload.email, &payload.username, &payload.password)
        .await?;
    Ok((StatusCode::CREATED, Json(AccountResponse::from(account))))
}

/// POST /api/auth/login
/// Unverified accounts still get a session; the client reads `verified`
/// to route them to the verification step.
async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> AppResult<impl IntoResponse> {
    let account = app_state
        .account_use_cases
        .login(&payload.username_or_email, &payload.password)
        .await?;
    let headers = session_headers(&app_state, account.id)?;
    Ok((StatusCode::OK, headers, Json(AccountResponse::from(account))))
}

async fn logout(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    let headers = cleared_session_headers(&app_state)?;
    Ok((StatusCode::OK, headers))
}

async fn me(State(app_state): State<AppState>, jar: CookieJar) -> AppResult<impl IntoResponse> {
    let account_id = current_account_id(&jar, &app_state)?;
    let account = app_state
        .account_use_cases
        .find_by_id(account_id)
        .await?
        .ok_or(AppError::InvalidCredentials)?;
    Ok(Json(AccountResponse::from(account)))
}
