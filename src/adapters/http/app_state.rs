use std::sync::Arc;

use crate::{
    infra::config::AppConfig,
    use_cases::{
        account::AccountUseCases, password_reset::PasswordResetUseCases,
        verification::VerificationUseCases,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub account_use_cases: Arc<AccountUseCases>,
    pub verification_use_cases: Arc<VerificationUseCases>,
    pub password_reset_use_cases: Arc<PasswordResetUseCases>,
}
