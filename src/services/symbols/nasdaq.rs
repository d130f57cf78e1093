//! 纳斯达克上市列表数据源
//!
//! 对接 datahub.io 的 nasdaq-listings JSON:
//! `[{"Symbol": "AAPL", "Company Name": "Apple Inc."}, ...]`

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

use crate::config::SymbolsConfig;
use crate::models::{NasdaqListing, SymbolRecord};

/// 公司代码远端数据源
#[async_trait]
pub trait SymbolSource: Send + Sync {
    /// 拉取完整列表，字段不全的记录已被丢弃
    async fn fetch(&self) -> Result<Vec<SymbolRecord>>;
}

/// 基于 HTTP 的纳斯达克列表数据源
pub struct NasdaqSymbolSource {
    /// HTTP 客户端
    client: Client,
    /// 列表地址
    url: Url,
}

impl NasdaqSymbolSource {
    pub fn new(config: &SymbolsConfig) -> Result<Self> {
        let url = Url::parse(&config.listing_url)
            .map_err(|e| anyhow!("无效的列表地址 {}: {}", config.listing_url, e))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()?;

        Ok(Self { client, url })
    }
}

#[async_trait]
impl SymbolSource for NasdaqSymbolSource {
    async fn fetch(&self) -> Result<Vec<SymbolRecord>> {
        log::info!("📡 请求纳斯达克上市列表 URL: {}", self.url);

        let response = self
            .client
            .get(self.url.clone())
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("获取上市列表失败: {}", response.status()));
        }

        let text = response.text().await?;
        parse_listings(&text)
    }
}

/// 解析上市列表 JSON
///
/// 顶层必须是数组，否则视为数据异常
pub fn parse_listings(data: &str) -> Result<Vec<SymbolRecord>> {
    let listings: Vec<NasdaqListing> =
        serde_json::from_str(data).map_err(|e| anyhow!("解析上市列表失败: {}", e))?;

    let total = listings.len();
    let records: Vec<SymbolRecord> = listings
        .into_iter()
        .filter_map(NasdaqListing::into_record)
        .collect();

    if records.len() < total {
        log::debug!("丢弃 {} 条字段不全的记录", total - records.len());
    }

    Ok(records)
}
