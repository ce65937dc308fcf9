use async_trait::async_trait;

use crate::{app_error::AppResult, use_cases::tokens::EmailSender};

/// Development sender: writes the message to the log instead of mailing it.
#[derive(Clone, Default)]
pub struct LogEmailSender;

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send(&self, to: &str, subject: &str, html: &str) -> AppResult<()> {
        tracing::info!(to, subject, body_len = html.len(), "Email not delivered (no RESEND_API_KEY)");
        tracing::debug!(to, html, "Email body");
        Ok(())
    }
}
