//! 复盘服务的错误类型。
//!
//! 此模块定义整个服务共用的错误分类。
//! 调用方错误（日期格式、缺失参数、枚举外的过滤值）与
//! 数据源错误（仓库不可达）严格区分：空结果集不是错误。

use thiserror::Error;

/// 核心服务错误。
#[derive(Debug, Error)]
pub enum ReviewError {
    /// 日期格式非法（既不是 YYYY-MM-DD 也不是 YYYYMMDD）
    #[error("日期格式非法: {0}")]
    InvalidDateFormat(String),

    /// 缺少必填参数
    #[error("缺少必填参数: {0}")]
    MissingParameter(String),

    /// 过滤值不在枚举域内
    #[error("过滤条件非法: {0}")]
    InvalidFilter(String),

    /// 数据仓库不可用（连接/超时/查询失败）
    #[error("数据源错误: {0}")]
    DataSource(String),

    /// 缓存错误（旁路加速层，调用方通常可忽略）
    #[error("缓存错误: {0}")]
    Cache(String),

    /// 序列化错误
    #[error("序列化错误: {0}")]
    Serialization(String),

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),

    /// 内部错误
    #[error("内部错误: {0}")]
    Internal(String),
}

/// 复盘服务的 Result 类型。
pub type ReviewResult<T> = Result<T, ReviewError>;

impl ReviewError {
    /// 是否为调用方错误（应映射为 4xx）。
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            ReviewError::InvalidDateFormat(_)
                | ReviewError::MissingParameter(_)
                | ReviewError::InvalidFilter(_)
        )
    }

    /// 是否为数据源不可用（应映射为 503）。
    pub fn is_unavailable(&self) -> bool {
        matches!(self, ReviewError::DataSource(_))
    }

    /// 机器可读的错误码。
    pub fn code(&self) -> &'static str {
        match self {
            ReviewError::InvalidDateFormat(_) => "INVALID_DATE_FORMAT",
            ReviewError::MissingParameter(_) => "MISSING_PARAMETER",
            ReviewError::InvalidFilter(_) => "INVALID_FILTER",
            ReviewError::DataSource(_) => "DATA_SOURCE_UNAVAILABLE",
            ReviewError::Cache(_) => "CACHE_ERROR",
            ReviewError::Serialization(_) => "SERIALIZATION_ERROR",
            ReviewError::Config(_) => "CONFIG_ERROR",
            ReviewError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for ReviewError {
    fn from(err: serde_json::Error) -> Self {
        ReviewError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for ReviewError {
    fn from(err: config::ConfigError) -> Self {
        ReviewError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caller_errors() {
        assert!(ReviewError::InvalidDateFormat("bad".to_string()).is_caller_error());
        assert!(ReviewError::MissingParameter("trade_date".to_string()).is_caller_error());
        assert!(ReviewError::InvalidFilter("foo".to_string()).is_caller_error());
        assert!(!ReviewError::DataSource("timeout".to_string()).is_caller_error());
    }

    #[test]
    fn test_unavailable() {
        assert!(ReviewError::DataSource("pool exhausted".to_string()).is_unavailable());
        assert!(!ReviewError::Internal("oops".to_string()).is_unavailable());
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            ReviewError::InvalidDateFormat("x".to_string()).code(),
            "INVALID_DATE_FORMAT"
        );
        assert_eq!(
            ReviewError::DataSource("x".to_string()).code(),
            "DATA_SOURCE_UNAVAILABLE"
        );
    }
}
