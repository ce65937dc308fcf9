//! One-time code minting and the policy that governs how long a code lives.

use chrono::{NaiveDateTime, TimeDelta};
use rand::{Rng, rngs::OsRng};

use crate::entities::token::TokenRecord;

const HEX_ALPHABET: &[u8] = b"0123456789abcdef";

pub const DEFAULT_CODE_LENGTH: usize = 4;

pub trait CodeGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Lowercase hex codes from the OS RNG. Codes are not checked against the
/// live token population, so short lengths can collide.
#[derive(Debug, Clone)]
pub struct RandomCodeGenerator {
    length: usize,
}

impl RandomCodeGenerator {
    pub fn new(length: usize) -> Self {
        Self {
            length: length.max(1),
        }
    }
}

impl Default for RandomCodeGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_LENGTH)
    }
}

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        (0..self.length)
            .map(|_| HEX_ALPHABET[OsRng.gen_range(0..HEX_ALPHABET.len())] as char)
            .collect()
    }
}

/// Lifetime rules applied by the workflows. The default keeps codes alive
/// until consumed or overwritten and allows unlimited attempts.
#[derive(Debug, Clone, Copy)]
pub struct TokenPolicy {
    pub code_length: usize,
    pub ttl: Option<TimeDelta>,
    pub max_attempts: Option<u32>,
}

impl Default for TokenPolicy {
    fn default() -> Self {
        Self {
            code_length: DEFAULT_CODE_LENGTH,
            ttl: None,
            max_attempts: None,
        }
    }
}

impl TokenPolicy {
    pub fn is_expired(&self, token: &TokenRecord, now: NaiveDateTime) -> bool {
        self.ttl
            .is_some_and(|ttl| now.signed_duration_since(token.issued_at) > ttl)
    }

    pub fn attempts_exhausted(&self, failed_attempts: u32) -> bool {
        self.max_attempts.is_some_and(|max| failed_attempts >= max)
    }
}
