use std::sync::Arc;

use tracing::instrument;

use crate::{
    app_error::{AppError, AppResult},
    entities::token::TokenKind,
    use_cases::{
        account::AccountRepo,
        tokens::{Notifier, TokenLifecycle},
    },
};

/// Forgot-password flow: `requested -> code issued -> consumed + credential changed`.
#[derive(Clone)]
pub struct PasswordResetUseCases {
    accounts: Arc<dyn AccountRepo>,
    tokens: TokenLifecycle,
    notifier: Arc<dyn Notifier>,
}

impl PasswordResetUseCases {
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

    /// Sends a reset code to an existing account. A pending code is sent
    /// again as-is rather than replaced.
    #[instrument(skip(self))]
    pub async fn request_code(&self, email: &str) -> AppResult<()> {
        let email = email.trim();
        if email.is_empty() {
            return Err(AppError::MissingInput("Email is required".into()));
        }
        if !self.accounts.exists(email).await? {
            return Err(AppError::NotFound("Email does not exist".into()));
        }

        let code = self
            .tokens
            .outstanding_or_mint(email, TokenKind::Reset)
            .await?;
        self.notifier.send_reset(email, &code).await
    }

    #[instrument(skip(self, code, new_password))]
    pub async fn submit_reset(&self, email: &str, code: &str, new_password: &str) -> AppResult<()> {
        let email = email.trim();
        let code = code.trim();
        if code.is_empty() || new_password.is_empty() {
            return Err(AppError::MissingInput(
                "Please provide a reset code and a new password".into(),
            ));
        }

        self.tokens.check(email, TokenKind::Reset, code).await?;

        self.accounts.update_credential(email, new_password).await?;
        self.tokens.consume(email, TokenKind::Reset, code).await?;

        tracing::info!("Password reset");
        Ok(())
    }
}
