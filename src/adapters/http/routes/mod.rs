pub mod auth;
pub mod password;
mod session;
pub mod verification;

use axum::Router;

use crate::adapters::http::app_state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/auth",
        auth::router()
            .merge(verification::router())
            .merge(password::router()),
    )
}
