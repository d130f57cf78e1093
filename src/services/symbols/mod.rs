//! 公司代码服务模块
//!
//! 提供代码校验和公司名称查询，数据来自纳斯达克上市列表

pub mod directory;
pub mod nasdaq;

pub use directory::SymbolDirectory;
pub use nasdaq::{NasdaqSymbolSource, SymbolSource};
