//! 配置模块
//!
//! 支持从 JSON 文件加载系统配置

use anyhow::anyhow;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 纳斯达克上市公司列表
pub const NASDAQ_LISTINGS_URL: &str = "https://pkgstore.datahub.io/core/nasdaq-listings/nasdaq-listed_json/data/a5bc7580d6176d60ac0b2142ca8d7df6/nasdaq-listed_json.json";

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,
    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
    /// 工作线程数（0 表示使用 CPU 核心数）
    #[serde(default)]
    pub workers: usize,
}

/// 公司代码数据源配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolsConfig {
    /// 上市列表地址
    #[serde(default = "default_listing_url")]
    pub listing_url: String,
    /// 缓存有效期（秒）
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
    /// 请求超时时间（秒）
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// 连接超时时间（秒）
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

/// 邮件传输方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MailTransport {
    /// 只记录日志，不实际发送（本地开发）
    Log,
    /// 通过 SMTP 发送
    Smtp,
}

/// 邮件配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    #[serde(default = "default_transport")]
    pub transport: MailTransport,
    /// SMTP 服务器
    #[serde(default)]
    pub host: String,
    /// SMTP 端口
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    /// SMTP 用户名（为空则不认证）
    #[serde(default)]
    pub username: String,
    /// SMTP 密码，可由 MAILER_PASSWORD 环境变量覆盖
    #[serde(default)]
    pub password: String,
    /// 发件人
    #[serde(default = "default_sender")]
    pub from: String,
    /// 发送失败时是否让整个请求失败（502）
    #[serde(default = "default_strict_delivery")]
    pub strict_delivery: bool,
}

/// 校验配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// 计算"今天"所用的时区（IANA 名称）
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// 日志级别: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,
    /// 公司代码数据源配置
    #[serde(default)]
    pub symbols: SymbolsConfig,
    /// 邮件配置
    #[serde(default)]
    pub mail: MailConfig,
    /// 校验配置
    #[serde(default)]
    pub validation: ValidationConfig,
    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

// 默认值函数
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_listing_url() -> String { NASDAQ_LISTINGS_URL.to_string() }
fn default_cache_ttl() -> u64 { 3600 }
fn default_timeout() -> u64 { 10 }
fn default_connect_timeout() -> u64 { 5 }
fn default_transport() -> MailTransport { MailTransport::Log }
fn default_smtp_port() -> u16 { 587 }
fn default_sender() -> String { "noreply@xm-stock-quotes.local".to_string() }
fn default_strict_delivery() -> bool { true }
fn default_timezone() -> String { "UTC".to_string() }
fn default_log_level() -> String { "info".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: 0,
        }
    }
}

impl Default for SymbolsConfig {
    fn default() -> Self {
        Self {
            listing_url: default_listing_url(),
            cache_ttl_secs: default_cache_ttl(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl SymbolsConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            transport: default_transport(),
            host: String::new(),
            port: default_smtp_port(),
            username: String::new(),
            password: String::new(),
            from: default_sender(),
            strict_delivery: default_strict_delivery(),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
        }
    }
}

impl ValidationConfig {
    /// 解析时区
    pub fn tz(&self) -> anyhow::Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| anyhow!("无效的时区 {}: {}", self.timezone, e))
    }
}

impl LogConfig {
    /// 解析日志级别（不区分大小写），无效时返回 None
    pub fn level_filter(&self) -> Option<log::LevelFilter> {
        self.level.trim().parse().ok()
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// 配置来源
#[derive(Debug, Default)]
pub struct ConfigOrigin {
    /// 成功加载的文件，None 表示使用默认配置
    pub path: Option<PathBuf>,
    /// 存在但无法加载的文件及原因
    pub failures: Vec<(PathBuf, String)>,
}

impl ConfigOrigin {
    pub fn log(&self) {
        for (path, e) in &self.failures {
            log::warn!("加载配置文件 {} 失败: {}", path.display(), e);
        }
        match &self.path {
            Some(path) => log::info!("从 {} 加载配置成功", path.display()),
            None => log::info!("使用默认配置"),
        }
    }
}

impl AppConfig {
    /// 从 JSON 文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// 加载配置，优先从文件，失败则使用默认值
    ///
    /// 加载发生在日志初始化之前，来源信息通过 `ConfigOrigin` 返回，由调用方稍后输出
    pub fn load() -> (Self, ConfigOrigin) {
        let paths = [PathBuf::from("config.json"), PathBuf::from("config/config.json")];
        let (mut config, origin) = Self::load_from(&paths);
        config.apply_env();
        (config, origin)
    }

    /// 依次尝试给定路径，使用第一个存在且能解析的文件
    pub fn load_from(paths: &[PathBuf]) -> (Self, ConfigOrigin) {
        let mut origin = ConfigOrigin::default();
        for path in paths {
            if !path.exists() {
                continue;
            }
            match Self::from_file(path) {
                Ok(loaded) => {
                    origin.path = Some(path.clone());
                    return (loaded, origin);
                }
                Err(e) => origin.failures.push((path.clone(), e.to_string())),
            }
        }
        (Self::default(), origin)
    }

    /// 环境变量覆盖（密钥不写入配置文件）
    fn apply_env(&mut self) {
        if let Ok(password) = env::var("MAILER_PASSWORD") {
            self.mail.password = password;
        }
    }

    /// 获取服务器绑定地址
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.symbols.listing_url, NASDAQ_LISTINGS_URL);
        assert_eq!(config.symbols.cache_ttl(), Duration::from_secs(3600));
        assert_eq!(config.mail.transport, MailTransport::Log);
        assert_eq!(config.mail.from, "noreply@xm-stock-quotes.local");
        assert!(config.mail.strict_delivery);
        assert_eq!(config.validation.tz().unwrap(), chrono_tz::UTC);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{
            "server": {"port": 9000},
            "mail": {"transport": "smtp", "host": "smtp.example.com", "strict_delivery": false},
            "validation": {"timezone": "Europe/Sofia"}
        }"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.bind_addr(), "0.0.0.0:9000");
        assert_eq!(config.mail.transport, MailTransport::Smtp);
        assert_eq!(config.mail.host, "smtp.example.com");
        assert_eq!(config.mail.port, 587);
        assert!(!config.mail.strict_delivery);
        assert_eq!(config.symbols.cache_ttl_secs, 3600);
        assert_eq!(config.validation.tz().unwrap(), chrono_tz::Europe::Sofia);
    }

    #[test]
    fn test_log_level_filter() {
        let level = |raw: &str| LogConfig { level: raw.to_string() }.level_filter();

        assert_eq!(LogConfig::default().level_filter(), Some(log::LevelFilter::Info));
        assert_eq!(level("debug"), Some(log::LevelFilter::Debug));
        assert_eq!(level("WARN"), Some(log::LevelFilter::Warn));
        assert_eq!(level("off"), Some(log::LevelFilter::Off));
        assert_eq!(level("loud"), None);
    }

    #[test]
    fn test_load_from_skips_broken_file() {
        let dir = env::temp_dir().join(format!("stock-quotes-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let broken = dir.join("broken.json");
        let valid = dir.join("valid.json");
        fs::write(&broken, "{ not json").unwrap();
        fs::write(&valid, r#"{"log": {"level": "debug"}}"#).unwrap();

        let paths = [dir.join("missing.json"), broken.clone(), valid.clone()];
        let (config, origin) = AppConfig::load_from(&paths);

        assert_eq!(config.log.level_filter(), Some(log::LevelFilter::Debug));
        assert_eq!(origin.path, Some(valid));
        assert_eq!(origin.failures.len(), 1);
        assert_eq!(origin.failures[0].0, broken);

        let (config, origin) = AppConfig::load_from(&[dir.join("missing.json")]);
        assert_eq!(config.log.level, "info");
        assert!(origin.path.is_none());
        assert!(origin.failures.is_empty());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_invalid_timezone() {
        let config = ValidationConfig {
            timezone: "Mars/Olympus".to_string(),
        };
        assert!(config.tz().is_err());
    }
}
