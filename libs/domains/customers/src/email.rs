//! Email dispatch seam.
//!
//! Transport is an external concern; the service only needs something that
//! accepts a confirmation message. Delivery failures are logged by the
//! caller and never surfaced to the client.

use async_trait::async_trait;

#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Send the email-confirmation message containing `token` to `to`.
    async fn send_confirmation(&self, to: &str, token: &str) -> Result<(), String>;
}

/// Sender that only logs, for development and tests.
#[derive(Debug, Default, Clone)]
pub struct LoggingEmailSender;

#[async_trait]
impl EmailSender for LoggingEmailSender {
    async fn send_confirmation(&self, to: &str, token: &str) -> Result<(), String> {
        tracing::info!(recipient = %to, token = %token, "Confirmation email (logging sender)");
        Ok(())
    }
}
