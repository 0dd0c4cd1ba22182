pub mod mailgun;

use async_trait::async_trait;

#[async_trait]
pub trait EmailProvider: Send + Sync {
    async fn send_email(&self, to: &str, subject: &str, html: &str) -> anyhow::Result<()>;
}

/// Dev-mode provider: logs the message and drops it.
pub struct NoopEmailer;

#[async_trait]
impl EmailProvider for NoopEmailer {
    async fn send_email(&self, to: &str, subject: &str, _html: &str) -> anyhow::Result<()> {
        tracing::info!(to = %to, subject = %subject, "email sending disabled, dropping message");
        Ok(())
    }
}
