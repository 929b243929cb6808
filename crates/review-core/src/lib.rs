//! # Review Core
//!
//! A股市场复盘服务的核心领域层。
//!
//! 提供整个服务共用的基础类型：
//! - 交易日期归一化（YYYY-MM-DD / YYYYMMDD）
//! - 证券代码与板块分类
//! - 数值清洗与单位换算（NaN/Inf/NULL 处理、元→亿元）
//! - 错误分类体系
//! - 交易日历扩展点
//! - 配置管理
//! - 日志基础设施

pub mod calendar;
pub mod config;
pub mod error;
pub mod logging;
pub mod sanitize;
pub mod types;

pub use calendar::*;
pub use config::*;
pub use error::*;
pub use logging::*;
pub use types::*;
