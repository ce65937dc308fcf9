use async_trait::async_trait;
use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    entities::account::{Account, NewAccount},
    use_cases::account::AccountRepo,
};

// Account row as stored in the db. The password column is never selected.
#[derive(sqlx::FromRow, Debug)]
struct AccountDb {
    id: Uuid,
    username: String,
    email: String,
    is_verified: bool,
    created_at: Option<NaiveDateTime>,
}

impl From<AccountDb> for Account {
    fn from(row: AccountDb) -> Self {
        Account {
            id: row.id,
            username: row.username,
            email: row.email,
            verified: row.is_verified,
            created_at: row.created_at,
        }
    }
}

const ACCOUNT_COLUMNS: &str = "id, username, email, is_verified, created_at";

#[async_trait]
impl AccountRepo for PostgresPersistence {
    async fn exists(&self, email: &str) -> AppResult<bool> {
        let found: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM accounts WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await
                .map_err(AppError::from)?;
        Ok(found)
    }

    async fn username_exists(&self, username: &str) -> AppResult<bool> {
        let found: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM accounts WHERE username = $1)")
                .bind(username)
                .fetch_one(&self.pool)
                .await
                .map_err(AppError::from)?;
        Ok(found)
    }

    async fn create(&self, account: NewAccount<'_>) -> AppResult<Account> {
        let id = Uuid::new_v4();
        let rec = sqlx::query_as::<_, AccountDb>(&format!(
            r#"
            INSERT INTO accounts (id, username, email, password, is_verified)
            VALUES ($1, $2, $3, $4, FALSE)
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(account.username)
        .bind(account.email)
        .bind(account.password)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(rec.into())
    }

    async fn find_by_identifier(&self, username_or_email: &str) -> AppResult<Option<Account>> {
        let rec = sqlx::query_as::<_, AccountDb>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE username = $1 OR email = $1 LIMIT 1"
        ))
        .bind(username_or_email)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(rec.map(Account::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        let rec = sqlx::query_as::<_, AccountDb>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(rec.map(Account::from))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        let rec = sqlx::query_as::<_, AccountDb>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(rec.map(Account::from))
    }

    async fn check_credentials(&self, username_or_email: &str, password: &str) -> AppResult<bool> {
        let matched: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM accounts
                WHERE (username = $1 OR email = $1) AND password = $2
            )
            "#,
        )
        .bind(username_or_email)
        .bind(password)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(matched)
    }

    async fn mark_verified(&self, email: &str) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE accounts SET is_verified = TRUE, updated_at = CURRENT_TIMESTAMP WHERE email = $1",
        )
        .bind(email)
        .execute(&self.pool)
        .await
        .map_err(AppError::from)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Account not found".into()));
        }
        Ok(())
    }

    async fn update_credential(&self, email: &str, new_password: &str) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE accounts SET password = $2, updated_at = CURRENT_TIMESTAMP WHERE email = $1",
        )
        .bind(email)
        .bind(new_password)
        .execute(&self.pool)
        .await
        .map_err(AppError::from)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Account not found".into()));
        }
        Ok(())
    }
}
