//! 行情 CSV 导出

use crate::models::Quote;

pub const CSV_HEADER: &str = "Date,Open,High,Low,Close,Volume";

/// 渲染为 CSV 文本
///
/// 首行固定表头，价格保留 6 位小数，行间以 `\n` 分隔，末尾无换行
pub fn quotes_to_csv(quotes: &[Quote]) -> String {
    let mut lines = Vec::with_capacity(quotes.len() + 1);
    lines.push(CSV_HEADER.to_string());

    for quote in quotes {
        lines.push(format!(
            "{},{:.6},{:.6},{:.6},{:.6},{}",
            quote.date.format("%Y-%m-%d"),
            quote.open,
            quote.high,
            quote.low,
            quote.close,
            quote.volume,
        ));
    }

    lines.join("\n")
}
