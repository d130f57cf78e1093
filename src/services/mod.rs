//! 业务逻辑服务模块
//!
//! 封装行情生成、公司代码查询、校验和邮件发送

pub mod csv;             // CSV 导出
pub mod notify;          // 邮件通知
pub mod quote_generator; // 模拟行情生成
pub mod quote_service;   // 请求处理流程
pub mod symbols;         // 公司代码目录
pub mod validation;      // 请求校验

pub use quote_generator::QuoteGenerator;
pub use quote_service::QuoteService;
