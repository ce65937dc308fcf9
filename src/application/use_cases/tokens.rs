use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::{
    app_error::{AppError, AppResult},
    application::codes::{CodeGenerator, TokenPolicy},
    entities::token::{TokenKind, TokenRecord},
};

/// Persistent (email, kind) -> code mapping. At most one live token per pair.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Inserts the code, or overwrites the pair's existing code. Resets the
    /// issue time and failure counter.
    async fn upsert(&self, email: &str, kind: TokenKind, code: &str) -> AppResult<()>;
    async fn lookup(&self, email: &str, kind: TokenKind) -> AppResult<Option<TokenRecord>>;
    /// True iff the pair currently holds exactly this code. Never deletes.
    async fn validate(&self, email: &str, kind: TokenKind, code: &str) -> AppResult<bool>;
    /// Deletes the matching row. No-op when nothing matches.
    async fn consume(&self, email: &str, kind: TokenKind, code: &str) -> AppResult<()>;
    /// Returns the new failure count, 0 when the pair holds no token.
    async fn record_failed_attempt(&self, email: &str, kind: TokenKind) -> AppResult<u32>;
    /// Deletes whatever token the pair holds.
    async fn revoke(&self, email: &str, kind: TokenKind) -> AppResult<()>;
}

/// Delivers codes to their owner.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_verification(&self, email: &str, code: &str) -> AppResult<()>;
    async fn send_reset(&self, email: &str, code: &str) -> AppResult<()>;
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html: &str) -> AppResult<()>;
}

/// Issue/check primitives shared by the verification and reset workflows.
#[derive(Clone)]
pub struct TokenLifecycle {
    store: Arc<dyn TokenStore>,
    generator: Arc<dyn CodeGenerator>,
    policy: TokenPolicy,
}

impl TokenLifecycle {
    pub fn new(
        store: Arc<dyn TokenStore>,
        generator: Arc<dyn CodeGenerator>,
        policy: TokenPolicy,
    ) -> Self {
        Self {
            store,
            generator,
            policy,
        }
    }

    pub fn policy(&self) -> &TokenPolicy {
        &self.policy
    }

    /// The pair's current code if one exists and has not expired.
    pub async fn outstanding(&self, email: &str, kind: TokenKind) -> AppResult<Option<String>> {
        let now = Utc::now().naive_utc();
        Ok(self
            .store
            .lookup(email, kind)
            .await?
            .filter(|token| !self.policy.is_expired(token, now))
            .map(|token| token.code))
    }

    /// Mints a fresh code and stores it over any existing one.
    pub async fn mint(&self, email: &str, kind: TokenKind) -> AppResult<String> {
        let code = self.generator.generate();
        self.store.upsert(email, kind, &code).await?;
        tracing::debug!(%kind, "Issued new code");
        Ok(code)
    }

    /// Outstanding code if present, otherwise a freshly minted one.
    pub async fn outstanding_or_mint(&self, email: &str, kind: TokenKind) -> AppResult<String> {
        match self.outstanding(email, kind).await? {
            Some(code) => Ok(code),
            None => self.mint(email, kind).await,
        }
    }

    /// Checks a submitted code without consuming it.
    ///
    /// Expired tokens are revoked and reported as `CodeExpired`. A wrong code
    /// counts against the attempt limit when one is configured; reaching it
    /// revokes the token.
    pub async fn check(&self, email: &str, kind: TokenKind, code: &str) -> AppResult<()> {
        let Some(token) = self.store.lookup(email, kind).await? else {
            return Err(AppError::NotFound("No pending code for this email".into()));
        };

        if self.policy.is_expired(&token, Utc::now().naive_utc()) {
            self.store.revoke(email, kind).await?;
            return Err(AppError::CodeExpired);
        }

        if self.store.validate(email, kind, code).await? {
            return Ok(());
        }

        if self.policy.max_attempts.is_some() {
            let failed = self.store.record_failed_attempt(email, kind).await?;
            if self.policy.attempts_exhausted(failed) {
                self.store.revoke(email, kind).await?;
                tracing::warn!(%kind, failed, "Attempt limit reached, code revoked");
                return Err(AppError::TooManyAttempts);
            }
        }

        Err(AppError::InvalidCode)
    }

    pub async fn consume(&self, email: &str, kind: TokenKind, code: &str) -> AppResult<()> {
        self.store.consume(email, kind, code).await
    }
}
