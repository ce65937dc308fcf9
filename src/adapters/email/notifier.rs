use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    app_error::AppResult,
    application::email_templates::{reset_code_email, verification_code_email},
    use_cases::tokens::{EmailSender, Notifier},
};

/// Renders code emails and hands them to an [`EmailSender`].
#[derive(Clone)]
pub struct EmailNotifier {
    sender: Arc<dyn EmailSender>,
    app_origin: String,
    ttl_minutes: Option<i64>,
}

impl EmailNotifier {
    pub fn new(sender: Arc<dyn EmailSender>, app_origin: String, ttl_minutes: Option<i64>) -> Self {
        Self {
            sender,
            app_origin,
            ttl_minutes,
        }
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn send_verification(&self, email: &str, code: &str) -> AppResult<()> {
        let (subject, html) = verification_code_email(&self.app_origin, code, self.ttl_minutes);
        self.sender.send(email, &subject, &html).await
    }

    async fn send_reset(&self, email: &str, code: &str) -> AppResult<()> {
        let (subject, html) = reset_code_email(&self.app_origin, code, self.ttl_minutes);
        self.sender.send(email, &subject, &html).await
    }
}
