//! 历史行情数据模型
//!
//! 定义单日 OHLCV 数据结构

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 单日历史行情
///
/// 由 `QuoteGenerator` 生成，创建后不再修改。
/// 保证 `high >= max(open, close)`、`low <= min(open, close)`，日期为工作日。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// 日期（YYYY-MM-DD）
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    /// 开盘价
    #[serde(rename = "Open")]
    pub open: f64,
    /// 最高价
    #[serde(rename = "High")]
    pub high: f64,
    /// 最低价
    #[serde(rename = "Low")]
    pub low: f64,
    /// 收盘价
    #[serde(rename = "Close")]
    pub close: f64,
    /// 成交量
    #[serde(rename = "Volume")]
    pub volume: u64,
}
