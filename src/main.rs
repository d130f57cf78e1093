//! 历史行情服务
//!
//! 提供历史行情查询 API，生成模拟 OHLCV 数据并以 CSV 附件发送邮件
//! 公司代码来源：纳斯达克上市列表（datahub.io）

mod config;     // 配置加载
mod error;      // 错误定义
mod handlers;   // HTTP 请求处理器
mod models;     // 数据模型定义
mod services;   // 业务逻辑服务

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use crate::config::{AppConfig, MailTransport};
use crate::services::notify::{LogNotifier, Notifier, SmtpNotifier};
use crate::services::symbols::{NasdaqSymbolSource, SymbolDirectory};
use crate::services::QuoteService;

/// 应用程序入口
///
/// 加载配置后启动 HTTP 服务器，默认监听 0.0.0.0:8080
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let (config, origin) = AppConfig::load();

    // 日志级别取自配置，RUST_LOG 优先
    let level = config.log.level_filter();
    let default_filter = level.unwrap_or(log::LevelFilter::Info).to_string().to_lowercase();
    env_logger::init_from_env(Env::default().default_filter_or(default_filter));

    origin.log();
    if level.is_none() {
        log::warn!("无效的日志级别 {}，使用 info", config.log.level);
    }

    let timezone = config.validation.tz()?;
    let source = Arc::new(NasdaqSymbolSource::new(&config.symbols)?);
    let symbols = Arc::new(SymbolDirectory::new(source, config.symbols.cache_ttl()));

    let notifier: Arc<dyn Notifier> = match config.mail.transport {
        MailTransport::Smtp => Arc::new(SmtpNotifier::new(&config.mail)?),
        MailTransport::Log => {
            log::warn!("邮件传输方式为 log，行情邮件不会实际发送");
            Arc::new(LogNotifier)
        }
    };

    let service = web::Data::new(QuoteService::new(
        symbols,
        notifier,
        timezone,
        config.mail.strict_delivery,
    ));

    let bind_addr = config.bind_addr();
    log::info!("启动历史行情服务，监听 {}", bind_addr);

    // 创建并启动 HTTP 服务器
    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())  // 添加请求日志中间件
            .app_data(service.clone())
            .configure(handlers::config)  // 配置路由
    });
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(bind_addr)?.run().await?;
    Ok(())
}
