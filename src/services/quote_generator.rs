//! 模拟历史行情生成
//!
//! 行情是 (代码, 日期) 的纯函数，不依赖任何外部状态：
//! - 基准价: CRC-32(大写代码)，映射到 [10, 510]
//! - 每日波动: CRC-32("YYYY-MM-DD" + 原始代码)
//!
//! 周六、周日不生成数据。

use chrono::{Datelike, NaiveDate, Weekday};

use crate::models::Quote;

/// 价格保留的小数位
const PRICE_SCALE: f64 = 1_000_000.0;

/// 模拟行情生成器
#[derive(Debug, Default, Clone, Copy)]
pub struct QuoteGenerator;

impl QuoteGenerator {
    pub fn new() -> Self {
        Self
    }

    /// 生成 [start, end] 闭区间内每个工作日的行情，按日期升序
    ///
    /// start > end 或区间内没有工作日时返回空列表
    pub fn generate(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Vec<Quote> {
        let base_price = base_price(symbol);

        start
            .iter_days()
            .take_while(|date| *date <= end)
            .filter(|date| is_trading_day(*date))
            .map(|date| daily_quote(symbol, date, base_price))
            .collect()
    }
}

/// CRC-32 稳定哈希（UTF-8 字节）
fn stable_hash(input: &str) -> u32 {
    crc32fast::hash(input.as_bytes())
}

fn is_trading_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// 基准价只与大写代码有关
fn base_price(symbol: &str) -> f64 {
    let hash = stable_hash(&symbol.to_uppercase());
    10.0 + f64::from(hash % 50_000) / 100.0
}

fn daily_quote(symbol: &str, date: NaiveDate, base_price: f64) -> Quote {
    // 日哈希使用原始大小写的代码
    let day_hash = stable_hash(&format!("{}{}", date.format("%Y-%m-%d"), symbol));

    let variation = (f64::from(day_hash % 1000) - 500.0) / 1000.0;
    let open = base_price * (1.0 + variation * 0.05);
    let close = open * (1.0 + (f64::from(day_hash % 100) - 50.0) / 5000.0);
    let spread = f64::from(day_hash % 50) / 5000.0;
    let high = open.max(close) * (1.0 + spread);
    let low = open.min(close) * (1.0 - spread);
    let volume = 100_000 + u64::from(day_hash % 9_000_000);

    Quote {
        date,
        open: round_price(open),
        high: round_price(high),
        low: round_price(low),
        close: round_price(close),
        volume,
    }
}

fn round_price(value: f64) -> f64 {
    (value * PRICE_SCALE).round() / PRICE_SCALE
}
