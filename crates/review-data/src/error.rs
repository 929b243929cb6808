//! 数据层错误类型。

use thiserror::Error;

/// 数据访问相关错误。
#[derive(Debug, Error)]
pub enum DataError {
    /// 数据库连接错误
    #[error("Database connection error: {0}")]
    ConnectionError(String),

    /// 查询执行错误
    #[error("Query error: {0}")]
    QueryError(String),

    /// 记录不存在
    #[error("Record not found: {0}")]
    NotFound(String),

    /// 序列化/反序列化错误
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// 缓存错误
    #[error("Cache error: {0}")]
    CacheError(String),

    /// 连接池耗尽
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// 超时
    #[error("Operation timeout: {0}")]
    Timeout(String),
}

impl From<sqlx::Error> for DataError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DataError::NotFound("Row not found".to_string()),
            sqlx::Error::PoolTimedOut => DataError::PoolExhausted,
            sqlx::Error::Database(db_err) => DataError::QueryError(db_err.message().to_string()),
            _ => DataError::QueryError(err.to_string()),
        }
    }
}

impl From<redis::RedisError> for DataError {
    fn from(err: redis::RedisError) -> Self {
        DataError::CacheError(err.to_string())
    }
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        DataError::SerializationError(err.to_string())
    }
}

impl From<DataError> for review_core::ReviewError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::CacheError(msg) => review_core::ReviewError::Cache(msg),
            DataError::SerializationError(msg) => review_core::ReviewError::Serialization(msg),
            // 行不存在不算数据源故障，但走到这里说明调用方把它当错误抛出
            other => review_core::ReviewError::DataSource(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, DataError>;

#[cfg(test)]
mod tests {
    use super::*;
    use review_core::ReviewError;

    #[test]
    fn test_sqlx_row_not_found_maps_to_not_found() {
        let err: DataError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, DataError::NotFound(_)));
    }

    #[test]
    fn test_query_error_becomes_data_source_unavailable() {
        let review: ReviewError = DataError::QueryError("boom".into()).into();
        assert!(matches!(review, ReviewError::DataSource(_)));
        assert!(review.is_unavailable());
    }

    #[test]
    fn test_cache_error_stays_cache() {
        let review: ReviewError = DataError::CacheError("redis down".into()).into();
        assert!(matches!(review, ReviewError::Cache(_)));
    }
}
