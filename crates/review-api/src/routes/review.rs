//! 每日复盘端点。
//!
//! 分项端点（大盘概览、板块资金、龙虎榜、热门概念）直接落库，
//! 聚合端点 `/daily-review` 走组装器并按 (端点, 日期) 缓存。

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use review_core::{TradeDate, TradingCalendar, WeekdayCalendar};
use review_data::{review_cache_key, warehouse, WarehouseSource};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::composer::{DailyReview, ReportComposer};
use crate::error::{db_unavailable, map_review_error, ApiResult, DataEnvelope};
use crate::state::AppState;

/// 只带交易日的查询参数。
#[derive(Debug, Deserialize)]
pub struct DateParams {
    pub date: Option<String>,
}

/// 大盘概览响应：基准指数加市场宽度统计。
#[derive(Debug, Serialize, Deserialize)]
pub struct OverviewResponse {
    pub date: String,
    pub indices: Vec<warehouse::IndexOverviewRow>,
    pub statistics: warehouse::MarketStatsRow,
}

/// GET /overview?date=
pub async fn market_overview(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DateParams>,
) -> ApiResult<Json<DataEnvelope<OverviewResponse>>> {
    let date = TradeDate::require(params.date.as_deref(), "date").map_err(map_review_error)?;
    let pool = state.db.as_ref().ok_or_else(db_unavailable)?;

    let (indices, statistics) = tokio::try_join!(
        warehouse::benchmark_overview(pool, &date),
        warehouse::market_statistics(pool, &date),
    )
    .map_err(|e| map_review_error(e.into()))?;

    Ok(Json(DataEnvelope::new(OverviewResponse {
        date: date.as_str().to_string(),
        indices,
        statistics,
    })))
}

/// GET /sector-flow?date=
pub async fn sector_flow(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DateParams>,
) -> ApiResult<Json<DataEnvelope<Vec<warehouse::SectorFlowRow>>>> {
    let date = TradeDate::require(params.date.as_deref(), "date").map_err(map_review_error)?;
    let pool = state.db.as_ref().ok_or_else(db_unavailable)?;

    let rows = warehouse::sector_flow(pool, &date)
        .await
        .map_err(|e| map_review_error(e.into()))?;
    Ok(Json(DataEnvelope::new(rows)))
}

/// GET /top-list?date=
pub async fn top_list(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DateParams>,
) -> ApiResult<Json<DataEnvelope<Vec<warehouse::TopListRow>>>> {
    let date = TradeDate::require(params.date.as_deref(), "date").map_err(map_review_error)?;
    let pool = state.db.as_ref().ok_or_else(db_unavailable)?;

    let rows = warehouse::top_list(pool, &date)
        .await
        .map_err(|e| map_review_error(e.into()))?;
    Ok(Json(DataEnvelope::new(rows)))
}

/// GET /concepts?date=
pub async fn concepts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DateParams>,
) -> ApiResult<Json<DataEnvelope<Vec<warehouse::ConceptRow>>>> {
    let date = TradeDate::require(params.date.as_deref(), "date").map_err(map_review_error)?;
    let pool = state.db.as_ref().ok_or_else(db_unavailable)?;

    let rows = warehouse::concepts(pool, &date)
        .await
        .map_err(|e| map_review_error(e.into()))?;
    Ok(Json(DataEnvelope::new(rows)))
}

/// GET /daily-review?date=
///
/// 六分项聚合报表，整单失败语义由组装器保证。
pub async fn daily_review(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DateParams>,
) -> ApiResult<Json<DataEnvelope<DailyReview>>> {
    let date = TradeDate::require(params.date.as_deref(), "date").map_err(map_review_error)?;
    // 非交易日照常放行，各分项通常查出空列表
    if !WeekdayCalendar.is_trading_day(&date) {
        debug!(date = %date, "请求日期不是交易日");
    }
    let pool = state.db.as_ref().ok_or_else(db_unavailable)?;

    let cache_key = review_cache_key("daily-review", date.as_str(), &[]);
    if let Some(cached) = state.cache_get::<DailyReview>(&cache_key).await {
        debug!(key = %cache_key, "每日复盘命中缓存");
        return Ok(Json(DataEnvelope::new(cached)));
    }

    let composer = ReportComposer::new(WarehouseSource::new(pool.clone()));
    let review = composer
        .compose_daily_review(&date)
        .await
        .map_err(map_review_error)?;

    state.cache_set(&cache_key, &review).await;
    Ok(Json(DataEnvelope::new(review)))
}

/// 每日复盘路由。
pub fn review_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/overview", get(market_overview))
        .route("/sector-flow", get(sector_flow))
        .route("/top-list", get(top_list))
        .route("/concepts", get(concepts))
        .route("/daily-review", get(daily_review))
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
        let app = review_router().with_state(Arc::new(create_test_state()));
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
    async fn test_bad_date_is_422() {
        let (status, body) = get_response("/overview?date=bad-date").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.code, "INVALID_DATE_FORMAT");
    }

    #[tokio::test]
    async fn test_missing_date_is_422() {
        let (status, body) = get_response("/daily-review").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.code, "MISSING_PARAMETER");
    }

    #[tokio::test]
    async fn test_iso_date_accepted_but_db_missing_is_503() {
        // 日期校验在数据库之前，ISO 写法通过校验后才碰到无库
        let (status, body) = get_response("/sector-flow?date=2024-01-05").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.code, "DATA_SOURCE_UNAVAILABLE");
    }
}
