//! Session cookie handling shared by the login and verification routes.

use axum::http::{HeaderMap, HeaderValue};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    adapters::http::app_state::AppState,
    app_error::{AppError, AppResult},
    application::jwt,
    entities::account::Account,
};

pub(super) const ACCESS_COOKIE: &str = "access_token";

#[derive(Serialize)]
pub(super) struct AccountResponse {
    id: Uuid,
    username: String,
    email: String,
    verified: bool,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            username: account.username,
            email: account.email,
            verified: account.verified,
        }
    }
}

fn append_cookie(headers: &mut HeaderMap, cookie: Cookie<'_>) -> AppResult<()> {
    let value = HeaderValue::from_str(&cookie.to_string())
        .map_err(|_| AppError::Internal("Failed to build cookie header".into()))?;
    headers.append("set-cookie", value);
    Ok(())
}

fn secure(app_state: &AppState) -> bool {
    app_state.config.app_origin.scheme() == "https"
}

/// Signs an access token for the account and returns it as a cookie header.
pub(super) fn session_headers(app_state: &AppState, account_id: Uuid) -> AppResult<HeaderMap> {
    let ttl = app_state.config.access_token_ttl;
    let access = jwt::issue(account_id, &app_state.config.jwt_secret, ttl)?;

    let cookie = Cookie::build((ACCESS_COOKIE, access))
        .http_only(true)
        .secure(secure(app_state))
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(ttl)
        .build();

    let mut headers = HeaderMap::new();
    append_cookie(&mut headers, cookie)?;
    Ok(headers)
}

pub(super) fn cleared_session_headers(app_state: &AppState) -> AppResult<HeaderMap> {
    let cookie = Cookie::build((ACCESS_COOKIE, ""))
        .http_only(true)
        .secure(secure(app_state))
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::seconds(0))
        .build();

    let mut headers = HeaderMap::new();
    append_cookie(&mut headers, cookie)?;
    Ok(headers)
}

pub(super) fn current_account_id(jar: &CookieJar, app_state: &AppState) -> AppResult<Uuid> {
    let Some(access_cookie) = jar.get(ACCESS_COOKIE) else {
        return Err(AppError::InvalidCredentials);
    };
    jwt::account_id(access_cookie.value(), &app_state.config.jwt_secret)
}
