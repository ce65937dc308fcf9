pub mod account;
pub mod password_reset;
pub mod tokens;
pub mod verification;
