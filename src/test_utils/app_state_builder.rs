use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderValue;
use secrecy::SecretString;
use time::Duration;
use url::Url;

use crate::{
    adapters::http::app_state::AppState,
    application::codes::TokenPolicy,
    entities::account::Account,
    infra::config::AppConfig,
    test_utils::{Harness, HarnessBuilder},
};

pub const TEST_JWT_SECRET: &str = "test_jwt_secret";

/// Builds an `AppState` over the in-memory harness. The returned harness
/// shares its stores and notifier with the state, so tests can seed and
/// inspect them around HTTP calls.
///
/// ```ignore
/// let account = create_test_account(|a| a.verified = false);
/// let (app_state, harness) = TestAppStateBuilder::new()
///     .with_account(account, "secret")
///     .with_codes(&["7f3a"])
///     .build();
/// ```
#[derive(Default)]
pub struct TestAppStateBuilder {
    harness: HarnessBuilder,
    accounts: Vec<(Account, String)>,
}

impl TestAppStateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(mut self, account: Account, password: &str) -> Self {
        self.accounts.push((account, password.to_string()));
        self
    }

    pub fn with_codes(mut self, codes: &[&str]) -> Self {
        self.harness = self.harness.codes(codes);
        self
    }

    pub fn with_policy(mut self, policy: TokenPolicy) -> Self {
        self.harness = self.harness.policy(policy);
        self
    }

    pub fn with_failing_notifier(mut self) -> Self {
        self.harness = self.harness.failing_notifier();
        self
    }

    pub fn build(self) -> (AppState, Harness) {
        let accounts = self
            .accounts
            .iter()
            .map(|(account, password)| (account.clone(), password.as_str()))
            .collect();
        let harness = self.harness.accounts(accounts).build();

        let config = Arc::new(AppConfig {
            database_url: String::new(),
            db_max_connections: 1,
            jwt_secret: SecretString::new(TEST_JWT_SECRET.into()),
            access_token_ttl: Duration::hours(24),
            app_origin: Url::parse("http://localhost:3000").unwrap(),
            cors_origin: HeaderValue::from_static("http://localhost:3000"),
            bind_addr: "127.0.0.1:3001".parse::<SocketAddr>().unwrap(),
            resend_api_key: None,
            email_from: "Wellness <no-reply@localhost>".to_string(),
            token_policy: harness.policy,
            log_file: String::new(),
        });

        let app_state = AppState {
            config,
            account_use_cases: Arc::new(harness.accounts.clone()),
            verification_use_cases: Arc::new(harness.verification.clone()),
            password_reset_use_cases: Arc::new(harness.reset.clone()),
        };

        (app_state, harness)
    }
}
