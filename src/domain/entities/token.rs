use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// What a one-time code authorizes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TokenKind {
    /// Proves control of the email address given at registration.
    Verification,
    /// Authorizes a credential change for the email's account.
    Reset,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Verification => "verification",
            TokenKind::Reset => "reset",
        }
    }
}

/// A live token as held by the token store. One per (email, kind).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRecord {
    pub email: String,
    pub kind: TokenKind,
    pub code: String,
    pub failed_attempts: u32,
    pub issued_at: NaiveDateTime,
}
