use std::sync::Arc;

use tracing::instrument;

use crate::{
    app_error::{AppError, AppResult},
    entities::{account::Account, token::TokenKind},
    use_cases::{
        account::AccountRepo,
        tokens::{Notifier, TokenLifecycle},
    },
};

/// Email verification: `unverified -> code issued -> verified`.
#[derive(Clone)]
pub struct VerificationUseCases {
    accounts: Arc<dyn AccountRepo>,
    tokens: TokenLifecycle,
    notifier: Arc<dyn Notifier>,
}

impl VerificationUseCases {
    pub fn new(
        accounts: Arc<dyn AccountRepo>,
        tokens: TokenLifecycle,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            accounts,
            tokens,
            notifier,
        }
    }

    /// Sends the outstanding verification code, minting one only when none
    /// is pending.
    #[instrument(skip(self))]
    pub async fn request_code(&self, email: &str) -> AppResult<()> {
        let email = email.trim();
        self.ensure_unverified(email).await?;

        let code = self
            .tokens
            .outstanding_or_mint(email, TokenKind::Verification)
            .await?;
        self.notifier.send_verification(email, &code).await
    }

    /// Always mints a new code, replacing any pending one.
    #[instrument(skip(self))]
    pub async fn resend_code(&self, email: &str) -> AppResult<()> {
        let email = email.trim();
        self.ensure_unverified(email).await?;

        let code = self.tokens.mint(email, TokenKind::Verification).await?;
        self.notifier.send_verification(email, &code).await
    }

    /// Marks the account verified and consumes the code. A wrong code leaves
    /// both the account and the pending code untouched.
    #[instrument(skip(self, code))]
    pub async fn submit_code(&self, email: &str, code: &str) -> AppResult<Account> {
        let email = email.trim();
        let code = code.trim();
        if code.is_empty() {
            return Err(AppError::MissingInput("Verification code is required".into()));
        }

        self.tokens
            .check(email, TokenKind::Verification, code)
            .await?;

        self.accounts.mark_verified(email).await?;
        self.tokens
            .consume(email, TokenKind::Verification, code)
            .await?;

        tracing::info!("Email verified");
        self.accounts
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::NotFound("Account not found".into()))
    }

    async fn ensure_unverified(&self, email: &str) -> AppResult<()> {
        match self.accounts.find_by_email(email).await? {
            None => Err(AppError::NotFound("Email does not exist".into())),
            Some(account) if account.verified => Err(AppError::AlreadyVerified),
            Some(_) => Ok(()),
        }
    }
}
