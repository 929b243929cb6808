//! # Review API
//!
//! A股市场复盘服务的 REST 层。
//!
//! 组成：
//! - [`state`] - 共享应用状态（连接池、缓存）
//! - [`error`] - 统一响应约定（data 包装与错误映射）
//! - [`composer`] - 报表组装（每日复盘、涨停分析）
//! - [`routes`] - 各端点与路由组合

pub mod composer;
pub mod error;
pub mod routes;
pub mod state;

pub use composer::{DailyReview, LimitAnalysis, ReportComposer};
pub use error::{ApiErrorResponse, ApiResult, DataEnvelope};
pub use state::AppState;
