use std::fs::File;
use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    adapters::{
        email::{log_sender::LogEmailSender, notifier::EmailNotifier, resend::ResendEmailSender},
        http::app_state::AppState,
    },
    application::codes::RandomCodeGenerator,
    infra::{config::AppConfig, error::InfraError, postgres_persistence},
    use_cases::{
        account::{AccountRepo, AccountUseCases},
        password_reset::PasswordResetUseCases,
        tokens::{EmailSender, Notifier, TokenLifecycle, TokenStore},
        verification::VerificationUseCases,
    },
};

pub async fn init_app_state(config: AppConfig) -> Result<AppState, InfraError> {
    let postgres_arc =
        Arc::new(postgres_persistence(&config.database_url, config.db_max_connections).await?);
    let account_repo = postgres_arc.clone() as Arc<dyn AccountRepo>;
    let token_store = postgres_arc as Arc<dyn TokenStore>;

    let sender: Arc<dyn EmailSender> = match &config.resend_api_key {
        Some(api_key) => Arc::new(
            ResendEmailSender::new(api_key.clone(), config.email_from.clone())
                .map_err(|e| InfraError::EmailSender(e.to_string()))?,
        ),
        None => {
            tracing::warn!("RESEND_API_KEY not set, emails will only be logged");
            Arc::new(LogEmailSender)
        }
    };

    let policy = config.token_policy;
    let notifier: Arc<dyn Notifier> = Arc::new(EmailNotifier::new(
        sender,
        config.app_origin.to_string(),
        policy.ttl.map(|ttl| ttl.num_minutes()),
    ));

    let tokens = TokenLifecycle::new(
        token_store,
        Arc::new(RandomCodeGenerator::new(policy.code_length)),
        policy,
    );

    let account_use_cases =
        AccountUseCases::new(account_repo.clone(), tokens.clone(), notifier.clone());
    let verification_use_cases =
        VerificationUseCases::new(account_repo.clone(), tokens.clone(), notifier.clone());
    let password_reset_use_cases = PasswordResetUseCases::new(account_repo, tokens, notifier);

    Ok(AppState {
        config: Arc::new(config),
        account_use_cases: Arc::new(account_use_cases),
        verification_use_cases: Arc::new(verification_use_cases),
        password_reset_use_cases: Arc::new(password_reset_use_cases),
    })
}

/// Pretty console output plus JSON lines in `log_file`. When the file cannot
/// be created, only the console layer is installed.
pub fn init_tracing(log_file: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "wellness_auth=debug,tower_http=debug".into());

    // Console (pretty logs)
    let console_layer = fmt::layer().with_target(false).with_level(true).pretty();

    // File (structured JSON logs)
    let (json_layer, file_error) = match File::create(log_file) {
        Ok(file) => {
            let layer = fmt::layer()
                .json()
                .with_writer(file)
                .with_current_span(true)
                .with_span_list(true);
            (Some(layer), None)
        }
        Err(e) => (None, Some(InfraError::LogFile(e))),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();

    if let Some(e) = file_error {
        tracing::warn!(error = %e, log_file, "JSON log file disabled");
    }
}
