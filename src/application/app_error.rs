use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid code")]
    InvalidCode,

    #[error("Code expired")]
    CodeExpired,

    #[error("Too many failed attempts")]
    TooManyAttempts,

    #[error("Missing input: {0}")]
    MissingInput(String),

    #[error("Account already verified")]
    AlreadyVerified,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Email delivery failed: {0}")]
    DeliveryFailure(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCode {
    DatabaseError,
    NotFound,
    InvalidCode,
    CodeExpired,
    TooManyAttempts,
    MissingInput,
    AlreadyVerified,
    Conflict,
    InvalidCredentials,
    InvalidInput,
    DeliveryFailure,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::InvalidCode => "INVALID_CODE",
            ErrorCode::CodeExpired => "CODE_EXPIRED",
            ErrorCode::TooManyAttempts => "TOO_MANY_ATTEMPTS",
            ErrorCode::MissingInput => "MISSING_INPUT",
            ErrorCode::AlreadyVerified => "ALREADY_VERIFIED",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::InvalidCredentials => "INVALID_CREDENTIALS",
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::DeliveryFailure => "DELIVERY_FAILURE",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Database(_) => ErrorCode::DatabaseError,
            AppError::NotFound(_) => ErrorCode::NotFound,
            AppError::InvalidCode => ErrorCode::InvalidCode,
            AppError::CodeExpired => ErrorCode::CodeExpired,
            AppError::TooManyAttempts => ErrorCode::TooManyAttempts,
            AppError::MissingInput(_) => ErrorCode::MissingInput,
            AppError::AlreadyVerified => ErrorCode::AlreadyVerified,
            AppError::Conflict(_) => ErrorCode::Conflict,
            AppError::InvalidCredentials => ErrorCode::InvalidCredentials,
            AppError::InvalidInput(_) => ErrorCode::InvalidInput,
            AppError::DeliveryFailure(_) => ErrorCode::DeliveryFailure,
            AppError::Internal(_) => ErrorCode::InternalError,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
