use crate::app_error::{AppError, ErrorCode};
use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the error before it gets converted into a status response.
        match &self {
            AppError::Database(_) | AppError::Internal(_) | AppError::DeliveryFailure(_) => {
                tracing::error!(error = ?self, "Request failed")
            }
            _ => tracing::warn!(error = ?self, "Request rejected"),
        }

        let status = status_for(&self);
        let code = self.code();
        let message = match self {
            AppError::NotFound(msg)
            | AppError::MissingInput(msg)
            | AppError::Conflict(msg)
            | AppError::InvalidInput(msg) => Some(msg),
            AppError::InvalidCode => Some("Invalid code.".to_string()),
            AppError::CodeExpired => Some("Code has expired. Request a new one.".to_string()),
            AppError::TooManyAttempts => {
                Some("Too many attempts. Request a new code.".to_string())
            }
            AppError::AlreadyVerified => Some("Account is already verified.".to_string()),
            // Upstream and storage details stay in the log.
            AppError::DeliveryFailure(_) => Some("Could not send email.".to_string()),
            AppError::Database(_) | AppError::Internal(_) | AppError::InvalidCredentials => None,
        };

        error_resp(status, code, message)
    }
}

fn status_for(err: &AppError) -> StatusCode {
    match err {
        AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        AppError::NotFound(_) => StatusCode::NOT_FOUND,
        AppError::InvalidCode
        | AppError::CodeExpired
        | AppError::TooManyAttempts
        | AppError::MissingInput(_)
        | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        AppError::AlreadyVerified | AppError::Conflict(_) => StatusCode::CONFLICT,
        AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        AppError::DeliveryFailure(_) => StatusCode::BAD_GATEWAY,
    }
}

fn error_resp(status: StatusCode, code: ErrorCode, message: Option<String>) -> Response {
    let body = match message {
        Some(msg) => serde_json::json!({ "code": code.as_str(), "message": msg }),
        None => serde_json::json!({ "code": code.as_str() }),
    };
    (status, Json(body)).into_response()
}
