pub mod log_sender;
pub mod notifier;
pub mod resend;
