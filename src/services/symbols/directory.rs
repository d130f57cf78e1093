//! 公司代码目录
//!
//! 缓存 大写代码 -> 公司名称 的映射：
//! - 首次访问或过期后整体刷新，刷新期间旧映射对读者仍然可见
//! - 刷新由互斥锁串行化，并发未命中只会触发一次上游请求
//! - 冷启动（尚无映射）时读者等待首次加载完成
//! - 上游失败时使用内置列表，并同样缓存一个 TTL 周期

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, RwLock};

use super::nasdaq::SymbolSource;
use crate::models::SymbolRecord;

/// 代码映射表，键为大写代码
pub type SymbolMap = HashMap<String, SymbolRecord>;

/// 上游不可用时的内置列表
const FALLBACK_SYMBOLS: &[(&str, &str)] = &[
    ("AAPL", "Apple Inc."),
    ("GOOGL", "Alphabet Inc."),
    ("GOOG", "Alphabet Inc."),
    ("MSFT", "Microsoft Corporation"),
    ("AMZN", "Amazon.com Inc."),
    ("META", "Meta Platforms Inc."),
    ("TSLA", "Tesla Inc."),
    ("NVDA", "NVIDIA Corporation"),
    ("NFLX", "Netflix Inc."),
    ("INTC", "Intel Corporation"),
];

/// 缓存条目
struct CacheEntry {
    symbols: Arc<SymbolMap>,
    /// None 表示 TTL 超出 Instant 可表示范围，视为永不过期
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_fresh(&self) -> bool {
        self.expires_at.map_or(true, |at| Instant::now() < at)
    }
}

/// 公司代码目录服务
pub struct SymbolDirectory {
    /// 远端数据源
    source: Arc<dyn SymbolSource>,
    /// 缓存有效期
    ttl: Duration,
    cache: RwLock<Option<CacheEntry>>,
    /// 刷新锁（single-flight）
    refresh_lock: Mutex<()>,
}

impl SymbolDirectory {
    pub fn new(source: Arc<dyn SymbolSource>, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            cache: RwLock::new(None),
            refresh_lock: Mutex::new(()),
        }
    }

    /// 获取当前代码映射，缺失或过期时刷新；他人刷新中时返回旧映射
    ///
    /// 永远不会失败：上游异常时返回内置列表
    pub async fn get_symbols(&self) -> Arc<SymbolMap> {
        let stale = {
            let cache = self.cache.read().await;
            match cache.as_ref() {
                Some(entry) if entry.is_fresh() => return entry.symbols.clone(),
                Some(entry) => Some(entry.symbols.clone()),
                None => None,
            }
        };

        let _guard = match stale {
            // 已有其他请求在刷新，先返回旧映射
            Some(symbols) => match self.refresh_lock.try_lock() {
                Ok(guard) => guard,
                Err(_) => return symbols,
            },
            None => self.refresh_lock.lock().await,
        };

        // 等锁期间可能已被其他请求刷新
        if let Some(symbols) = self.cached().await {
            return symbols;
        }

        let symbols = Arc::new(self.load().await);
        *self.cache.write().await = Some(CacheEntry {
            symbols: symbols.clone(),
            expires_at: Instant::now().checked_add(self.ttl),
        });

        symbols
    }

    /// 代码是否存在（不区分大小写）
    pub async fn is_valid_symbol(&self, symbol: &str) -> bool {
        self.get_symbols().await.contains_key(&symbol.to_uppercase())
    }

    /// 获取公司名称，未知代码返回 None
    pub async fn get_company_name(&self, symbol: &str) -> Option<String> {
        self.get_symbols()
            .await
            .get(&symbol.to_uppercase())
            .map(|record| record.name.clone())
    }

    async fn cached(&self) -> Option<Arc<SymbolMap>> {
        let cache = self.cache.read().await;
        cache
            .as_ref()
            .filter(|entry| entry.is_fresh())
            .map(|entry| entry.symbols.clone())
    }

    async fn load(&self) -> SymbolMap {
        match self.source.fetch().await {
            Ok(records) => {
                let symbols: SymbolMap = records
                    .into_iter()
                    .map(|record| (record.symbol.to_uppercase(), record))
                    .collect();
                log::info!("📊 公司代码缓存已刷新，共 {} 个代码", symbols.len());
                symbols
            }
            Err(e) => {
                log::warn!("获取纳斯达克上市列表失败，使用内置列表: {}", e);
                fallback_symbols()
            }
        }
    }
}

fn fallback_symbols() -> SymbolMap {
    FALLBACK_SYMBOLS
        .iter()
        .map(|(symbol, name)| (symbol.to_string(), SymbolRecord::new(symbol, name)))
        .collect()
}
