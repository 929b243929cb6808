//! 涨停板端点。
//!
//! `/limit-up` 返回带过滤的涨停列表（连板数降序、封板时间升序），
//! `/limit-analysis` 返回十分项聚合报表并按 (端点, 日期) 缓存。

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use review_core::TradeDate;
use review_data::warehouse::{self, validate_up_stat};
use review_data::{review_cache_key, WarehouseSource};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use crate::composer::{LimitAnalysis, ReportComposer};
use crate::error::{db_unavailable, map_review_error, ApiResult, DataEnvelope};
use crate::state::AppState;

/// 涨停列表查询参数。
#[derive(Debug, Deserialize)]
pub struct LimitUpParams {
    pub date: Option<String>,
    /// 最小连板数过滤
    pub limit_times: Option<i32>,
    /// 涨停统计过滤，形如 "3/5"（5 天内 3 板）
    pub up_stat: Option<String>,
}

/// GET /limit-up?date=&limit_times=&up_stat=
pub async fn limit_up(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LimitUpParams>,
) -> ApiResult<Json<DataEnvelope<Vec<warehouse::LimitUpRow>>>> {
    let date = TradeDate::require(params.date.as_deref(), "date").map_err(map_review_error)?;
    if let Some(ref up_stat) = params.up_stat {
        validate_up_stat(up_stat).map_err(map_review_error)?;
    }
    let pool = state.db.as_ref().ok_or_else(db_unavailable)?;

    let rows = warehouse::limit_up_board(
        pool,
        &date,
        params.limit_times,
        params.up_stat.as_deref(),
    )
    .await
    .map_err(|e| map_review_error(e.into()))?;

    Ok(Json(DataEnvelope::new(rows)))
}

/// GET /limit-analysis?date=
pub async fn limit_analysis(
    State(state): State<Arc<AppState>>,
    Query(params): Query<super::review::DateParams>,
) -> ApiResult<Json<DataEnvelope<LimitAnalysis>>> {
    let date = TradeDate::require(params.date.as_deref(), "date").map_err(map_review_error)?;
    let pool = state.db.as_ref().ok_or_else(db_unavailable)?;

    let cache_key = review_cache_key("limit-analysis", date.as_str(), &[]);
    if let Some(cached) = state.cache_get::<LimitAnalysis>(&cache_key).await {
        debug!(key = %cache_key, "涨停分析命中缓存");
        return Ok(Json(DataEnvelope::new(cached)));
    }

    let composer = ReportComposer::new(WarehouseSource::new(pool.clone()));
    let analysis = composer
        .compose_limit_analysis(&date)
        .await
        .map_err(map_review_error)?;

    state.cache_set(&cache_key, &analysis).await;
    Ok(Json(DataEnvelope::new(analysis)))
}

/// 涨停板路由。
pub fn limit_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/limit-up", get(limit_up))
        .route("/limit-analysis", get(limit_analysis))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiErrorResponse;
    use crate::state::create_test_state;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    async fn get_response(uri: &str) -> (StatusCode, ApiErrorResponse) {
        let app = limit_router().with_state(Arc::new(create_test_state()));
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_invalid_up_stat_is_422() {
        let (status, body) = get_response("/limit-up?date=20240105&up_stat=abc").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.code, "INVALID_FILTER");
    }

    #[tokio::test]
    async fn test_valid_up_stat_passes_validation() {
        // 格式合法，校验通过后才碰到无库
        let (status, body) = get_response("/limit-up?date=20240105&up_stat=3/5").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.code, "DATA_SOURCE_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_limit_analysis_requires_date() {
        let (status, body) = get_response("/limit-analysis").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.code, "MISSING_PARAMETER");
    }
}
