use validator::ValidateEmail;

/// Validates that the input looks like a valid email address
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    !email.is_empty() && email.validate_email()
}

/// Usernames are 1-50 characters, no whitespace and no `@` so they can never
/// be confused with an email when logging in by either.
pub fn is_valid_username(username: &str) -> bool {
    if username.is_empty() || username.chars().count() > 50 {
        return false;
    }

    !username.chars().any(|c| c.is_whitespace() || c == '@')
}
