//! 仅记录日志的通知实现，不实际发送邮件

use async_trait::async_trait;

use super::{NotifyError, Notifier, QuoteEmail};

#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, email: &QuoteEmail) -> Result<(), NotifyError> {
        log::info!(
            "📧 [log transport] to={} subject={} body=\"{}\" attachment={} ({} bytes)",
            email.to,
            email.subject,
            email.body,
            email.attachment.filename,
            email.attachment.content.len(),
        );
        Ok(())
    }
}
