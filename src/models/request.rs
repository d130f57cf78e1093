//! 行情请求模型
//!
//! - `QuoteRequestPayload`: 原始请求体，字段全部可选
//! - `QuoteRequest`: 校验通过后的请求

use chrono::NaiveDate;
use serde::Deserialize;

use super::symbol::lenient_string;

/// 原始请求体
///
/// POST /api/stock/quotes
/// ```json
/// {"companySymbol": "AAPL", "startDate": "2023-01-01", "endDate": "2023-01-31", "email": "user@example.com"}
/// ```
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequestPayload {
    #[serde(default, deserialize_with = "lenient_string")]
    pub company_symbol: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: Option<String>,
}

impl QuoteRequestPayload {
    /// 从请求体字节解析
    ///
    /// 空请求体、非法 JSON 或非对象 JSON 一律视为空请求，交给校验层报告缺失字段
    pub fn from_bytes(body: &[u8]) -> Self {
        match serde_json::from_slice::<QuoteRequestPayload>(body) {
            Ok(payload) => payload,
            Err(e) => {
                log::debug!("请求体无法解析，按空请求处理: {}", e);
                Self::default()
            }
        }
    }
}

/// 校验通过的行情请求
///
/// 仅在单次请求内存在，不做持久化
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRequest {
    /// 原始股票代码（未转大写）
    pub symbol: String,
    /// 开始日期（原始字符串）
    pub start_date: String,
    /// 结束日期（原始字符串）
    pub end_date: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// 收件人邮箱
    pub email: String,
}
