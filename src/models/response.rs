//! API 响应模型
//!
//! 定义接口返回格式：
//! - 成功: `QuoteResponse`
//! - 失败: `ErrorResponse`（`{"errors": [...]}`）

use serde::{Deserialize, Serialize};

use super::Quote;

/// 行情查询成功响应
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    /// 大写股票代码
    pub company_symbol: String,
    /// 公司名称
    pub company_name: String,
    /// 开始日期（与请求一致）
    pub start_date: String,
    /// 结束日期（与请求一致）
    pub end_date: String,
    /// 行情列表
    pub quotes: Vec<Quote>,
}

/// 错误响应，每条违规一条消息
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub errors: Vec<String>,
}

impl ErrorResponse {
    pub fn new(errors: Vec<String>) -> Self {
        Self { errors }
    }
}

/// 健康检查响应
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    /// 响应时间戳（RFC 3339，配置时区）
    pub timestamp: String,
}
