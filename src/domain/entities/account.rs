use chrono::NaiveDateTime;
use serde::Serialize;
use uuid::Uuid;

/// Account as exposed to the application layer. The stored credential never
/// leaves the persistence adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub verified: bool,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug)]
pub struct NewAccount<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}
