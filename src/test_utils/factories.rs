//! Test data factories. Each builds a valid object; the closure overrides fields.

use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::entities::account::Account;

pub fn create_test_account(overrides: impl FnOnce(&mut Account)) -> Account {
    let id = Uuid::new_v4();
    let short = &id.simple().to_string()[..8];
    let mut account = Account {
        id,
        username: format!("user_{short}"),
        email: format!("{short}@example.com"),
        verified: true,
        created_at: Some(test_datetime()),
    };
    overrides(&mut account);
    account
}

pub fn test_datetime() -> NaiveDateTime {
    chrono::DateTime::from_timestamp(1_700_000_000, 0)
        .map(|dt| dt.naive_utc())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accounts_are_unique_by_default() {
        let a = create_test_account(|_| {});
        let b = create_test_account(|_| {});
        assert_ne!(a.id, b.id);
        assert_ne!(a.email, b.email);
        assert_ne!(a.username, b.username);
    }

    #[test]
    fn overrides_apply() {
        let account = create_test_account(|a| {
            a.email = "a@x.com".into();
            a.verified = false;
        });
        assert_eq!(account.email, "a@x.com");
        assert!(!account.verified);
    }
}
