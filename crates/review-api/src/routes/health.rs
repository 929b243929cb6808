//! 健康检查端点。
//!
//! 供负载均衡与编排系统（Kubernetes 等）探活：
//! `/health` 只确认进程活着，`/health/ready` 逐项探测依赖。

use axum::{
    extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::state::AppState;

/// 就绪检查响应。
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// 总体状态 ("healthy" | "degraded")
    pub status: String,
    pub version: String,
    pub uptime_secs: i64,
    /// 当前时间（ISO 8601）
    pub timestamp: String,
    pub components: ComponentHealth,
}

/// 各依赖组件状态。
#[derive(Debug, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub database: ComponentStatus,
    pub redis: ComponentStatus,
}

/// 单个组件状态。
#[derive(Debug, Serialize, Deserialize)]
pub struct ComponentStatus {
    /// "up" | "down" | "not_configured"
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ComponentStatus {
    pub fn up() -> Self {
        Self {
            status: "up".to_string(),
            message: None,
        }
    }

    pub fn down(message: impl Into<String>) -> Self {
        Self {
            status: "down".to_string(),
            message: Some(message.into()),
        }
    }

    pub fn not_configured() -> Self {
        Self {
            status: "not_configured".to_string(),
            message: None,
        }
    }
}

/// 存活探针。GET /health
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// 就绪探针。GET /health/ready
///
/// 数据库挂了返回 503；Redis 只是旁路缓存，挂了降级为 degraded 但仍 200。
pub async fn health_ready(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut overall_status = "healthy";
    let mut status_code = StatusCode::OK;

    let database = if state.db.is_some() {
        if state.is_db_healthy().await {
            ComponentStatus::up()
        } else {
            overall_status = "degraded";
            status_code = StatusCode::SERVICE_UNAVAILABLE;
            ComponentStatus::down("连接失败")
        }
    } else {
        ComponentStatus::not_configured()
    };

    let redis = if state.has_cache() {
        if state.is_redis_healthy().await {
            ComponentStatus::up()
        } else {
            if overall_status == "healthy" {
                overall_status = "degraded";
            }
            ComponentStatus::down("连接失败")
        }
    } else {
        ComponentStatus::not_configured()
    };

    let response = HealthResponse {
        status: overall_status.to_string(),
        version: state.version.clone(),
        uptime_secs: state.uptime_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        components: ComponentHealth { database, redis },
    };

    (status_code, Json(response))
}

/// 健康检查路由。
pub fn health_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(health_check))
        .route("/ready", get(health_ready))
}
