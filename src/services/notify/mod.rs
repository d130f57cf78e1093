//! 通知发送模块
//!
//! 行情以 CSV 附件形式通过邮件发送给请求方：
//! - `SmtpNotifier`: SMTP 发送
//! - `LogNotifier`: 仅记录日志（本地开发）

pub mod email;
pub mod log_notifier;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::Quote;
use crate::services::csv::quotes_to_csv;

pub use email::SmtpNotifier;
pub use log_notifier::LogNotifier;

/// 附件文件名
pub const ATTACHMENT_NAME: &str = "historical_quotes.csv";
/// 附件 MIME 类型
pub const ATTACHMENT_CONTENT_TYPE: &str = "text/csv";

/// 通知发送错误
#[derive(Error, Debug)]
pub enum NotifyError {
    /// 配置错误（如 SMTP 地址无效）
    #[error("Configuration error: {0}")]
    Config(String),

    /// 邮件构建失败（如收件人地址无法解析）
    #[error("Build error: {0}")]
    Build(String),

    /// 网络或 SMTP 传输错误
    #[error("Transport error: {0}")]
    Transport(String),
}

/// 邮件附件
#[derive(Debug, Clone, PartialEq)]
pub struct EmailAttachment {
    pub filename: String,
    pub content_type: String,
    pub content: String,
}

/// 一封行情邮件
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteEmail {
    /// 收件人
    pub to: String,
    /// 主题（公司名称）
    pub subject: String,
    /// 正文
    pub body: String,
    pub attachment: EmailAttachment,
}

impl QuoteEmail {
    /// 构建行情邮件：主题为公司名称，正文为日期区间，附带 CSV
    pub fn for_quotes(
        recipient: &str,
        company_name: &str,
        start_date: &str,
        end_date: &str,
        quotes: &[Quote],
    ) -> Self {
        Self {
            to: recipient.to_string(),
            subject: company_name.to_string(),
            body: format!("From {} to {}", start_date, end_date),
            attachment: EmailAttachment {
                filename: ATTACHMENT_NAME.to_string(),
                content_type: ATTACHMENT_CONTENT_TYPE.to_string(),
                content: quotes_to_csv(quotes),
            },
        }
    }
}

/// 通知发送接口
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, email: &QuoteEmail) -> Result<(), NotifyError>;
}
