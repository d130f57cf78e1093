//! 服务错误定义
//!
//! - Validation: 请求校验失败，400
//! - Delivery: 邮件发送失败，502
//!
//! 上游代码列表获取失败在 `SymbolDirectory` 内部降级处理，不会出现在这里

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::models::ErrorResponse;
use crate::services::notify::NotifyError;

#[derive(Error, Debug)]
pub enum ServiceError {
    /// 校验失败，按顺序包含全部违规消息
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// 通知发送失败
    #[error("failed to deliver quotes email: {0}")]
    Delivery(#[from] NotifyError),
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Delivery(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let errors = match self {
            ServiceError::Validation(messages) => messages.clone(),
            // 不向调用方暴露 SMTP 细节
            ServiceError::Delivery(_) => vec!["Failed to deliver the quotes email.".to_string()],
        };
        HttpResponse::build(self.status_code()).json(ErrorResponse::new(errors))
    }
}
