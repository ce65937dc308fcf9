use std::str::FromStr;

use async_trait::async_trait;
use sqlx::Row;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    entities::token::{TokenKind, TokenRecord},
    use_cases::tokens::TokenStore,
};

fn row_to_record(row: sqlx::postgres::PgRow) -> AppResult<TokenRecord> {
    let kind: String = row.try_get("kind")?;
    let failed_attempts: i32 = row.try_get("failed_attempts")?;
    Ok(TokenRecord {
        email: row.try_get("email")?,
        kind: TokenKind::from_str(&kind)
            .map_err(|_| AppError::Internal(format!("Unknown token kind: {kind}")))?,
        code: row.try_get("code")?,
        failed_attempts: failed_attempts.max(0) as u32,
        issued_at: row.try_get("issued_at")?,
    })
}

#[async_trait]
impl TokenStore for PostgresPersistence {
    async fn upsert(&self, email: &str, kind: TokenKind, code: &str) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO verification_tokens (email, kind, code)
            VALUES ($1, $2, $3)
            ON CONFLICT (email, kind) DO UPDATE SET
                code = EXCLUDED.code,
                failed_attempts = 0,
                issued_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(email)
        .bind(kind.as_str())
        .bind(code)
        .execute(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(())
    }

    async fn lookup(&self, email: &str, kind: TokenKind) -> AppResult<Option<TokenRecord>> {
        let row = sqlx::query(
            "SELECT email, kind, code, failed_attempts, issued_at FROM verification_tokens WHERE email = $1 AND kind = $2",
        )
        .bind(email)
        .bind(kind.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        row.map(row_to_record).transpose()
    }

    async fn validate(&self, email: &str, kind: TokenKind, code: &str) -> AppResult<bool> {
        let found: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM verification_tokens WHERE email = $1 AND kind = $2 AND code = $3)",
        )
        .bind(email)
        .bind(kind.as_str())
        .bind(code)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(found)
    }

    async fn consume(&self, email: &str, kind: TokenKind, code: &str) -> AppResult<()> {
        sqlx::query("DELETE FROM verification_tokens WHERE email = $1 AND kind = $2 AND code = $3")
            .bind(email)
            .bind(kind.as_str())
            .bind(code)
            .execute(&self.pool)
            .await
            .map_err(AppError::from)?;
        Ok(())
    }

    async fn record_failed_attempt(&self, email: &str, kind: TokenKind) -> AppResult<u32> {
        let attempts: Option<i32> = sqlx::query_scalar(
            r#"
            UPDATE verification_tokens
            SET failed_attempts = failed_attempts + 1
            WHERE email = $1 AND kind = $2
            RETURNING failed_attempts
            "#,
        )
        .bind(email)
        .bind(kind.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(attempts.unwrap_or(0).max(0) as u32)
    }

    async fn revoke(&self, email: &str, kind: TokenKind) -> AppResult<()> {
        sqlx::query("DELETE FROM verification_tokens WHERE email = $1 AND kind = $2")
            .bind(email)
            .bind(kind.as_str())
            .execute(&self.pool)
            .await
            .map_err(AppError::from)?;
        Ok(())
    }
}
