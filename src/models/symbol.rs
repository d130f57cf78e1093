//! 公司代码数据模型

use serde::{Deserialize, Serialize};

/// 公司代码记录
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SymbolRecord {
    /// 大写股票代码（如 AAPL）
    pub symbol: String,
    /// 公司名称
    pub name: String,
}

impl SymbolRecord {
    pub fn new(symbol: &str, name: &str) -> Self {
        Self {
            symbol: symbol.to_uppercase(),
            name: name.to_string(),
        }
    }
}

/// 纳斯达克上市列表中的单条记录
///
/// 远端数据可能缺字段或字段类型不对，这里全部按可选处理，
/// 缺少任一字段的记录在构建缓存时丢弃
#[derive(Debug, Deserialize)]
pub struct NasdaqListing {
    #[serde(rename = "Symbol", default, deserialize_with = "lenient_string")]
    pub symbol: Option<String>,
    #[serde(rename = "Company Name", default, deserialize_with = "lenient_string")]
    pub company_name: Option<String>,
}

impl NasdaqListing {
    /// 转换为缓存记录，字段不全时返回 None
    pub fn into_record(self) -> Option<SymbolRecord> {
        match (self.symbol, self.company_name) {
            (Some(symbol), Some(name)) => Some(SymbolRecord::new(&symbol, &name)),
            _ => None,
        }
    }
}

/// 非字符串值（null、数字等）视为缺失
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_str().map(str::to_string))
}
