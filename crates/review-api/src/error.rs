//! 统一的 API 响应约定。
//!
//! 成功响应一律包一层 `{"data": ...}`；失败响应是
//! `{"code": ..., "detail": ...}` 加状态码：
//! 调用方错误（日期格式、缺参、枚举外过滤值）映射 422，
//! 数据源不可用映射 503，其余映射 500。
//! 空结果集不是失败，照常走 data 包装。

use axum::http::StatusCode;
use axum::Json;
use review_core::ReviewError;
use serde::{Deserialize, Serialize};

/// 成功响应包装。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

impl<T> DataEnvelope<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// 失败响应体。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// 机器可读错误码（如 "INVALID_DATE_FORMAT"）
    pub code: String,
    /// 面向人的错误描述
    pub detail: String,
    /// 错误发生时间（Unix 秒，可选）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl ApiErrorResponse {
    pub fn new(code: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            detail: detail.into(),
            timestamp: Some(chrono::Utc::now().timestamp()),
        }
    }

    /// 无时间戳的简单形式。
    pub fn simple(code: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            detail: detail.into(),
            timestamp: None,
        }
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.detail)
    }
}

impl std::error::Error for ApiErrorResponse {}

/// API 处理器的 Result 别名。
pub type ApiResult<T> = Result<T, (StatusCode, Json<ApiErrorResponse>)>;

/// 把领域错误映射为 HTTP 响应。
pub fn map_review_error(err: ReviewError) -> (StatusCode, Json<ApiErrorResponse>) {
    let status = if err.is_caller_error() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else if err.is_unavailable() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    (status, Json(ApiErrorResponse::new(err.code(), err.to_string())))
}

/// 数据库未配置或不可达时的标准响应。
pub fn db_unavailable() -> (StatusCode, Json<ApiErrorResponse>) {
    map_review_error(ReviewError::DataSource("数据库未配置".to_string()))
}
