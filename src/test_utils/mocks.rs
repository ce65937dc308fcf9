//! In-memory implementations of the persistence and delivery ports.

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::codes::CodeGenerator,
    entities::{
        account::{Account, NewAccount},
        token::{TokenKind, TokenRecord},
    },
    use_cases::{
        account::AccountRepo,
        tokens::{EmailSender, Notifier, TokenStore},
    },
};

// ============================================================================
// InMemoryAccountRepo
// ============================================================================

struct StoredAccount {
    account: Account,
    password: String,
}

#[derive(Default)]
pub struct InMemoryAccountRepo {
    accounts: Mutex<HashMap<Uuid, StoredAccount>>,
}

impl InMemoryAccountRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_accounts(accounts: Vec<(Account, String)>) -> Self {
        let map = accounts
            .into_iter()
            .map(|(account, password)| (account.id, StoredAccount { account, password }))
            .collect();
        Self {
            accounts: Mutex::new(map),
        }
    }

    pub fn get(&self, email: &str) -> Option<Account> {
        self.accounts
            .lock()
            .unwrap()
            .values()
            .find(|s| s.account.email == email)
            .map(|s| s.account.clone())
    }

    pub fn password_of(&self, email: &str) -> Option<String> {
        self.accounts
            .lock()
            .unwrap()
            .values()
            .find(|s| s.account.email == email)
            .map(|s| s.password.clone())
    }

    fn update_by_email(&self, email: &str, f: impl FnOnce(&mut StoredAccount)) -> AppResult<()> {
        let mut accounts = self.accounts.lock().unwrap();
        let stored = accounts
            .values_mut()
            .find(|s| s.account.email == email)
            .ok_or_else(|| AppError::NotFound("Account not found".into()))?;
        f(stored);
        Ok(())
    }
}

#[async_trait]
impl AccountRepo for InMemoryAccountRepo {
    async fn exists(&self, email: &str) -> AppResult<bool> {
        Ok(self.get(email).is_some())
    }

    async fn username_exists(&self, username: &str) -> AppResult<bool> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .values()
            .any(|s| s.account.username == username))
    }

    async fn create(&self, new: NewAccount<'_>) -> AppResult<Account> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts
            .values()
            .any(|s| s.account.username == new.username || s.account.email == new.email)
        {
            return Err(AppError::Conflict(
                "A record with this value already exists".into(),
            ));
        }

        let account = Account {
            id: Uuid::new_v4(),
            username: new.username.to_string(),
            email: new.email.to_string(),
            verified: false,
            created_at: Some(Utc::now().naive_utc()),
        };
        accounts.insert(
            account.id,
            StoredAccount {
                account: account.clone(),
                password: new.password.to_string(),
            },
        );
        Ok(account)
    }

    async fn find_by_identifier(&self, username_or_email: &str) -> AppResult<Option<Account>> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .values()
            .find(|s| {
                s.account.username == username_or_email || s.account.email == username_or_email
            })
            .map(|s| s.account.clone()))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        Ok(self.get(email))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .get(&id)
            .map(|s| s.account.clone()))
    }

    async fn check_credentials(&self, username_or_email: &str, password: &str) -> AppResult<bool> {
        Ok(self.accounts.lock().unwrap().values().any(|s| {
            (s.account.username == username_or_email || s.account.email == username_or_email)
                && s.password == password
        }))
    }

    async fn mark_verified(&self, email: &str) -> AppResult<()> {
        self.update_by_email(email, |s| s.account.verified = true)
    }

    async fn update_credential(&self, email: &str, new_password: &str) -> AppResult<()> {
        self.update_by_email(email, |s| s.password = new_password.to_string())
    }
}

// ============================================================================
// InMemoryTokenStore
// ============================================================================

/// Map keyed by (email, kind); the key makes duplicate live tokens impossible.
#[derive(Default)]
pub struct InMemoryTokenStore {
    tokens: Mutex<HashMap<(String, TokenKind), TokenRecord>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tokens.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn code(&self, email: &str, kind: TokenKind) -> Option<String> {
        self.tokens
            .lock()
            .unwrap()
            .get(&(email.to_string(), kind))
            .map(|t| t.code.clone())
    }

    /// Seeds a token issued `age` ago.
    pub fn insert_issued(&self, email: &str, kind: TokenKind, code: &str, age: TimeDelta) {
        let record = TokenRecord {
            email: email.to_string(),
            kind,
            code: code.to_string(),
            failed_attempts: 0,
            issued_at: Utc::now().naive_utc() - age,
        };
        self.tokens
            .lock()
            .unwrap()
            .insert((email.to_string(), kind), record);
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn upsert(&self, email: &str, kind: TokenKind, code: &str) -> AppResult<()> {
        self.insert_issued(email, kind, code, TimeDelta::zero());
        Ok(())
    }

    async fn lookup(&self, email: &str, kind: TokenKind) -> AppResult<Option<TokenRecord>> {
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .get(&(email.to_string(), kind))
            .cloned())
    }

    async fn validate(&self, email: &str, kind: TokenKind, code: &str) -> AppResult<bool> {
        Ok(self.code(email, kind).as_deref() == Some(code))
    }

    async fn consume(&self, email: &str, kind: TokenKind, code: &str) -> AppResult<()> {
        let mut tokens = self.tokens.lock().unwrap();
        let key = (email.to_string(), kind);
        if tokens.get(&key).is_some_and(|t| t.code == code) {
            tokens.remove(&key);
        }
        Ok(())
    }

    async fn record_failed_attempt(&self, email: &str, kind: TokenKind) -> AppResult<u32> {
        let mut tokens = self.tokens.lock().unwrap();
        Ok(match tokens.get_mut(&(email.to_string(), kind)) {
            Some(token) => {
                token.failed_attempts += 1;
                token.failed_attempts
            }
            None => 0,
        })
    }

    async fn revoke(&self, email: &str, kind: TokenKind) -> AppResult<()> {
        self.tokens
            .lock()
            .unwrap()
            .remove(&(email.to_string(), kind));
        Ok(())
    }
}

// ============================================================================
// Delivery
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentCode {
    pub kind: TokenKind,
    pub email: String,
    pub code: String,
}

/// Notifier that records every delivery, or fails every delivery.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<SentCode>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<SentCode> {
        self.sent.lock().unwrap().clone()
    }

    pub fn codes(&self, kind: TokenKind, email: &str) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.kind == kind && s.email == email)
            .map(|s| s.code.clone())
            .collect()
    }

    pub fn verification_codes(&self, email: &str) -> Vec<String> {
        self.codes(TokenKind::Verification, email)
    }

    pub fn reset_codes(&self, email: &str) -> Vec<String> {
        self.codes(TokenKind::Reset, email)
    }

    pub fn last_verification(&self, email: &str) -> Option<String> {
        self.verification_codes(email).pop()
    }

    pub fn last_reset(&self, email: &str) -> Option<String> {
        self.reset_codes(email).pop()
    }

    fn record(&self, kind: TokenKind, email: &str, code: &str) -> AppResult<()> {
        if self.fail {
            return Err(AppError::DeliveryFailure("smtp unreachable".into()));
        }
        self.sent.lock().unwrap().push(SentCode {
            kind,
            email: email.to_string(),
            code: code.to_string(),
        });
        Ok(())
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_verification(&self, email: &str, code: &str) -> AppResult<()> {
        self.record(TokenKind::Verification, email, code)
    }

    async fn send_reset(&self, email: &str, code: &str) -> AppResult<()> {
        self.record(TokenKind::Reset, email, code)
    }
}

#[derive(Debug, Clone)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[derive(Default)]
pub struct InMemoryEmailSender {
    pub sent: Mutex<Vec<SentEmail>>,
}

#[async_trait]
impl EmailSender for InMemoryEmailSender {
    async fn send(&self, to: &str, subject: &str, html: &str) -> AppResult<()> {
        self.sent.lock().unwrap().push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            html: html.to_string(),
        });
        Ok(())
    }
}

// ============================================================================
// SequenceCodeGenerator
// ============================================================================

/// Hands out queued codes in order, then unique numbered ones.
#[derive(Default)]
pub struct SequenceCodeGenerator {
    queued: Mutex<VecDeque<String>>,
    counter: Mutex<u32>,
}

impl SequenceCodeGenerator {
    pub fn new(codes: &[&str]) -> Self {
        Self {
            queued: Mutex::new(codes.iter().map(|c| c.to_string()).collect()),
            counter: Mutex::new(0),
        }
    }
}

impl CodeGenerator for SequenceCodeGenerator {
    fn generate(&self) -> String {
        if let Some(code) = self.queued.lock().unwrap().pop_front() {
            return code;
        }
        let mut counter = self.counter.lock().unwrap();
        *counter += 1;
        format!("{:04x}", *counter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn second_upsert_overwrites_first() {
        let store = InMemoryTokenStore::new();

        store.upsert("a@x.com", TokenKind::Verification, "aaaa").await.unwrap();
        store.upsert("a@x.com", TokenKind::Verification, "bbbb").await.unwrap();

        assert_eq!(store.len(), 1);
        assert!(!store.validate("a@x.com", TokenKind::Verification, "aaaa").await.unwrap());
        assert!(store.validate("a@x.com", TokenKind::Verification, "bbbb").await.unwrap());
    }

    #[tokio::test]
    async fn kinds_are_independent() {
        let store = InMemoryTokenStore::new();

        store.upsert("a@x.com", TokenKind::Verification, "1111").await.unwrap();
        store.upsert("a@x.com", TokenKind::Reset, "2222").await.unwrap();

        assert_eq!(store.len(), 2);
        assert!(!store.validate("a@x.com", TokenKind::Reset, "1111").await.unwrap());
    }

    #[tokio::test]
    async fn consume_only_deletes_matching_code() {
        let store = InMemoryTokenStore::new();
        store.upsert("a@x.com", TokenKind::Reset, "1234").await.unwrap();

        store.consume("a@x.com", TokenKind::Reset, "9999").await.unwrap();
        assert_eq!(store.len(), 1);

        store.consume("a@x.com", TokenKind::Reset, "1234").await.unwrap();
        store.consume("a@x.com", TokenKind::Reset, "1234").await.unwrap();
        assert!(store.lookup("a@x.com", TokenKind::Reset).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn upsert_resets_failure_counter() {
        let store = InMemoryTokenStore::new();
        store.upsert("a@x.com", TokenKind::Reset, "1234").await.unwrap();

        assert_eq!(store.record_failed_attempt("a@x.com", TokenKind::Reset).await.unwrap(), 1);
        assert_eq!(store.record_failed_attempt("a@x.com", TokenKind::Reset).await.unwrap(), 2);

        store.upsert("a@x.com", TokenKind::Reset, "5678").await.unwrap();
        let token = store.lookup("a@x.com", TokenKind::Reset).await.unwrap().unwrap();
        assert_eq!(token.failed_attempts, 0);
        assert_eq!(store.record_failed_attempt("b@x.com", TokenKind::Reset).await.unwrap(), 0);
    }

    #[test]
    fn sequence_generator_falls_back_to_unique_codes() {
        let generator = SequenceCodeGenerator::new(&["7f3a"]);
        assert_eq!(generator.generate(), "7f3a");
        assert_eq!(generator.generate(), "0001");
        assert_eq!(generator.generate(), "0002");
    }
}
