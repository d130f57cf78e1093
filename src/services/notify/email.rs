//! SMTP 邮件发送

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::{NotifyError, Notifier, QuoteEmail};
use crate::config::MailConfig;

/// SMTP 通知
///
/// `AsyncSmtpTransport` 在多次发送之间复用
pub struct SmtpNotifier {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    /// 发件人
    from: Mailbox,
}

impl SmtpNotifier {
    /// 使用 STARTTLS 连接 SMTP 服务器，配置了用户名时启用认证
    pub fn new(config: &MailConfig) -> Result<Self, NotifyError> {
        if config.host.is_empty() {
            return Err(NotifyError::Config("SMTP host is not set".to_string()));
        }

        let from = config
            .from
            .parse::<Mailbox>()
            .map_err(|e| NotifyError::Config(format!("Invalid from address: {}", e)))?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| NotifyError::Config(format!("Invalid SMTP host: {}", e)))?
            .port(config.port);

        if !config.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ));
        }

        Ok(Self {
            mailer: builder.build(),
            from,
        })
    }

    fn build_message(&self, email: &QuoteEmail) -> Result<Message, NotifyError> {
        build_message(self.from.clone(), email)
    }
}

fn build_message(from: Mailbox, email: &QuoteEmail) -> Result<Message, NotifyError> {
    let to = email
        .to
        .parse::<Mailbox>()
        .map_err(|e| NotifyError::Build(format!("Invalid recipient address: {}", e)))?;

    let content_type = ContentType::parse(&email.attachment.content_type)
        .map_err(|e| NotifyError::Build(format!("Invalid attachment type: {}", e)))?;

    let attachment = Attachment::new(email.attachment.filename.clone())
        .body(email.attachment.content.clone(), content_type);

    Message::builder()
        .from(from)
        .to(to)
        .subject(email.subject.clone())
        .multipart(
            MultiPart::mixed()
                .singlepart(SinglePart::plain(email.body.clone()))
                .singlepart(attachment),
        )
        .map_err(|e| NotifyError::Build(format!("Failed to build email: {}", e)))
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, email: &QuoteEmail) -> Result<(), NotifyError> {
        let message = self.build_message(email)?;

        self.mailer
            .send(message)
            .await
            .map_err(|e| NotifyError::Transport(format!("SMTP error: {}", e)))?;

        log::info!("📧 行情邮件已发送: {} ({})", email.to, email.subject);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::notify::{EmailAttachment, ATTACHMENT_CONTENT_TYPE, ATTACHMENT_NAME};

    fn sample_email(to: &str) -> QuoteEmail {
        QuoteEmail {
            to: to.to_string(),
            subject: "Apple Inc.".to_string(),
            body: "From 2023-01-02 to 2023-01-06".to_string(),
            attachment: EmailAttachment {
                filename: ATTACHMENT_NAME.to_string(),
                content_type: ATTACHMENT_CONTENT_TYPE.to_string(),
                content: "Date,Open,High,Low,Close,Volume".to_string(),
            },
        }
    }

    #[test]
    fn test_build_message() {
        let from: Mailbox = "noreply@xm-stock-quotes.local".parse().unwrap();
        let message = build_message(from, &sample_email("test@example.com")).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("Subject: Apple Inc."));
        assert!(raw.contains("To: test@example.com"));
        assert!(raw.contains("historical_quotes.csv"));
        assert!(raw.contains("text/csv"));
        assert!(raw.contains("From 2023-01-02 to 2023-01-06"));
    }

    #[test]
    fn test_build_message_invalid_recipient() {
        let from: Mailbox = "noreply@xm-stock-quotes.local".parse().unwrap();
        let result = build_message(from, &sample_email("not-an-address"));
        assert!(matches!(result, Err(NotifyError::Build(_))));
    }

    #[test]
    fn test_new_requires_host() {
        let config = MailConfig::default();
        assert!(matches!(SmtpNotifier::new(&config), Err(NotifyError::Config(_))));
    }
}
