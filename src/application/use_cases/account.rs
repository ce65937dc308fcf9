use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::validators::{is_valid_email, is_valid_username},
    entities::{
        account::{Account, NewAccount},
        token::TokenKind,
    },
    use_cases::tokens::{Notifier, TokenLifecycle},
};

#[async_trait]
pub trait AccountRepo: Send + Sync {
    async fn exists(&self, email: &str) -> AppResult<bool>;
    async fn username_exists(&self, username: &str) -> AppResult<bool>;
    async fn create(&self, account: NewAccount<'_>) -> AppResult<Account>;
    async fn find_by_identifier(&self, username_or_email: &str) -> AppResult<Option<Account>>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>>;
    async fn check_credentials(&self, username_or_email: &str, password: &str) -> AppResult<bool>;
    async fn mark_verified(&self, email: &str) -> AppResult<()>;
    async fn update_credential(&self, email: &str, new_password: &str) -> AppResult<()>;
}

#[derive(Clone)]
pub struct AccountUseCases {
    repo: Arc<dyn AccountRepo>,
    tokens: TokenLifecycle,
    notifier: Arc<dyn Notifier>,
}

impl AccountUseCases {
    pub fn new(
        repo: Arc<dyn AccountRepo>,
        tokens: TokenLifecycle,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            repo,
            tokens,
            notifier,
        }
    }

    /// Creates an unverified account and sends its first verification code.
    #[instrument(skip(self, password))]
    pub async fn register(&self, email: &str, username: &str, password: &str) -> AppResult<Account> {
        let email = email.trim();
        let username = username.trim();

        if email.is_empty() {
            return Err(AppError::MissingInput("Email is required".into()));
        }
        if !is_valid_email(email) {
            return Err(AppError::InvalidInput("Invalid email format".into()));
        }
        if username.is_empty() || password.is_empty() {
            return Err(AppError::MissingInput(
                "Username and password are required".into(),
            ));
        }
        if !is_valid_username(username) {
            return Err(AppError::InvalidInput("Invalid username".into()));
        }

        if self.repo.username_exists(username).await? {
            return Err(AppError::Conflict("Username already exists".into()));
        }
        if self.repo.exists(email).await? {
            return Err(AppError::Conflict("Email already exists".into()));
        }

        let account = self
            .repo
            .create(NewAccount {
                username,
                email,
                password,
            })
            .await?;

        let code = self.tokens.mint(email, TokenKind::Verification).await?;
        self.notifier.send_verification(email, &code).await?;

        tracing::info!(account_id = %account.id, "Account registered");
        Ok(account)
    }

    /// Returns the account on matching credentials, verified or not.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username_or_email: &str, password: &str) -> AppResult<Account> {
        let identifier = username_or_email.trim();
        if identifier.is_empty() || password.is_empty() {
            return Err(AppError::InvalidCredentials);
        }

        if !self.repo.check_credentials(identifier, password).await? {
            return Err(AppError::InvalidCredentials);
        }

        self.repo
            .find_by_identifier(identifier)
            .await?
            .ok_or(AppError::InvalidCredentials)
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        self.repo.find_by_id(id).await
    }
}
