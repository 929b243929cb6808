//! 数据访问层。
//!
//! 提供：
//! - 仓库查询目录（只读参数化 SQL，PostgreSQL）
//! - Redis 旁路缓存
//! - 报表取数的 [`MarketDataSource`] 接口

pub mod cache;
pub mod error;
pub mod source;
pub mod warehouse;

pub use cache::{review_cache_key, RedisCache, RedisConfig};
pub use error::{DataError, Result};
pub use source::{MarketDataSource, WarehouseSource};
