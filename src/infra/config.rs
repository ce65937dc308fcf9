use std::net::SocketAddr;
use std::str::FromStr;

use axum::http::HeaderValue;
use chrono::TimeDelta;
use env_helpers::get_env_default;
use secrecy::SecretString;
use time::Duration;
use url::Url;

use crate::{
    application::codes::{DEFAULT_CODE_LENGTH, TokenPolicy},
    infra::error::InfraError,
};

pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub jwt_secret: SecretString,
    pub access_token_ttl: Duration,
    pub app_origin: Url,
    pub cors_origin: HeaderValue,
    pub bind_addr: SocketAddr,
    /// Without a key, mail is written to the log instead of being sent.
    pub resend_api_key: Option<SecretString>,
    pub email_from: String,
    pub token_policy: TokenPolicy,
    pub log_file: String,
}

fn required(var: &'static str) -> Result<String, InfraError> {
    std::env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(InfraError::ConfigMissing { var })
}

fn optional<T: FromStr>(var: &'static str) -> Result<Option<T>, InfraError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(var) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| InfraError::InvalidConfig {
                var,
                reason: e.to_string(),
            }),
        _ => Ok(None),
    }
}

/// Builds the token policy from raw settings. Zero means "not set" for the
/// TTL and attempt limit.
pub fn token_policy(
    code_length: usize,
    ttl_minutes: Option<i64>,
    max_attempts: Option<u32>,
) -> Result<TokenPolicy, InfraError> {
    if code_length == 0 || code_length > 32 {
        return Err(InfraError::InvalidConfig {
            var: "TOKEN_CODE_LENGTH",
            reason: "must be between 1 and 32".into(),
        });
    }
    if matches!(ttl_minutes, Some(m) if m < 0) {
        return Err(InfraError::InvalidConfig {
            var: "TOKEN_TTL_MINUTES",
            reason: "must not be negative".into(),
        });
    }

    let ttl = match ttl_minutes.filter(|m| *m > 0) {
        Some(minutes) => Some(TimeDelta::try_minutes(minutes).ok_or_else(|| {
            InfraError::InvalidConfig {
                var: "TOKEN_TTL_MINUTES",
                reason: "out of range".into(),
            }
        })?),
        None => None,
    };

    Ok(TokenPolicy {
        code_length,
        ttl,
        max_attempts: max_attempts.filter(|n| *n > 0),
    })
}

impl AppConfig {
    pub fn from_env() -> Result<Self, InfraError> {
        let database_url = required("DATABASE_URL")?;
        let db_max_connections: u32 = get_env_default("DB_MAX_CONNECTIONS", 5);

        let jwt_secret = SecretString::new(required("JWT_SECRET")?.into());
        let access_token_ttl_secs: i64 = get_env_default("ACCESS_TOKEN_TTL_SECS", 86_400);

        let app_origin: Url =
            required("APP_ORIGIN")?
                .parse()
                .map_err(|e: url::ParseError| InfraError::InvalidConfig {
                    var: "APP_ORIGIN",
                    reason: e.to_string(),
                })?;
        let cors_origin: HeaderValue =
            get_env_default("CORS_ORIGIN", String::from("http://localhost:3000"))
                .parse()
                .map_err(|_| InfraError::InvalidConfig {
                    var: "CORS_ORIGIN",
                    reason: "not a valid header value".into(),
                })?;
        let bind_addr: SocketAddr = get_env_default(
            "BIND_ADDR",
            SocketAddr::from(([127, 0, 0, 1], 3001)),
        );

        let resend_api_key = optional::<String>("RESEND_API_KEY")?
            .map(|key| SecretString::new(key.into()));
        let email_from: String =
            get_env_default("EMAIL_FROM", String::from("Wellness <no-reply@localhost>"));

        let token_policy = token_policy(
            get_env_default("TOKEN_CODE_LENGTH", DEFAULT_CODE_LENGTH),
            optional("TOKEN_TTL_MINUTES")?,
            optional("TOKEN_MAX_ATTEMPTS")?,
        )?;

        let log_file: String = get_env_default("LOG_FILE", String::from("app.log"));

        Ok(Self {
            database_url,
            db_max_connections,
            jwt_secret,
            access_token_ttl: Duration::seconds(access_token_ttl_secs),
            app_origin,
            cors_origin,
            bind_addr,
            resend_api_key,
            email_from,
            token_policy,
            log_file,
        })
    }
}
