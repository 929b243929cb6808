//! 周内规律端点。
//!
//! 把单股区间日线按星期几聚合成规律报表。

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use review_analytics::{aggregate_by_weekday, WeeklyPatternReport};
use review_core::{ReviewError, TradeDate};
use review_data::warehouse;
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{db_unavailable, map_review_error, ApiResult, DataEnvelope};
use crate::state::AppState;

/// 区间参数。
#[derive(Debug, Deserialize)]
pub struct RangeParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// GET /weekly/{ts_code}?start_date=&end_date=
pub async fn weekly_pattern(
    State(state): State<Arc<AppState>>,
    Path(ts_code): Path<String>,
    Query(params): Query<RangeParams>,
) -> ApiResult<Json<DataEnvelope<WeeklyPatternReport>>> {
    let start = TradeDate::require(params.start_date.as_deref(), "start_date")
        .map_err(map_review_error)?;
    let end =
        TradeDate::require(params.end_date.as_deref(), "end_date").map_err(map_review_error)?;
    if start.as_str() > end.as_str() {
        return Err(map_review_error(ReviewError::InvalidFilter(format!(
            "起始日 {} 晚于截止日 {}",
            start, end
        ))));
    }
    let pool = state.db.as_ref().ok_or_else(db_unavailable)?;

    let bars = warehouse::daily_bars(pool, &ts_code, &start, &end)
        .await
        .map_err(|e| map_review_error(e.into()))?;

    Ok(Json(DataEnvelope::new(WeeklyPatternReport {
        ts_code,
        start_date: start.as_str().to_string(),
        end_date: end.as_str().to_string(),
        patterns: aggregate_by_weekday(&bars),
    })))
}

/// 周内规律路由。
pub fn weekly_router() -> Router<Arc<AppState>> {
    Router::new().route("/weekly/{ts_code}", get(weekly_pattern))
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
        let app = weekly_router().with_state(Arc::new(create_test_state()));
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
    async fn test_missing_range_is_422() {
        let (status, body) = get_response("/weekly/000001.SZ").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.code, "MISSING_PARAMETER");
    }

    #[tokio::test]
    async fn test_inverted_range_is_422() {
        let (status, body) =
            get_response("/weekly/000001.SZ?start_date=20240201&end_date=20240101").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.code, "INVALID_FILTER");
    }
}
