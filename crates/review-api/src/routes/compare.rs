//! 股票对比端点。
//!
//! 每只股票各自以区间首日收盘价重定基，跨股票只比相对涨跌幅。
//! 对比股票里的空序列是正常结果（停牌、新股），不触发失败。

use axum::{extract::State, routing::post, Json, Router};
use review_analytics::{build_series, ComparisonResult, ComparisonSeries};
use review_core::{ReviewError, TradeDate};
use review_data::warehouse;
use serde::Deserialize;
use sqlx::PgPool;
use std::sync::Arc;

use crate::error::{db_unavailable, map_review_error, ApiResult, DataEnvelope};
use crate::state::AppState;

/// 对比股票数上限。
const MAX_COMPARE_STOCKS: usize = 5;

/// 对比请求体。
#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    pub base_stock: String,
    #[serde(default)]
    pub compare_stocks: Vec<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

async fn load_series(
    pool: &PgPool,
    ts_code: &str,
    start: &TradeDate,
    end: &TradeDate,
) -> Result<ComparisonSeries, review_data::DataError> {
    let (basic, bars, limit) = tokio::try_join!(
        warehouse::stock_basic(pool, ts_code),
        warehouse::daily_bars(pool, ts_code, start, end),
        warehouse::limit_events(pool, ts_code, start, end),
    )?;
    Ok(build_series(ts_code, basic, &bars, limit))
}

/// POST /stock/compare
pub async fn stock_compare(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CompareRequest>,
) -> ApiResult<Json<DataEnvelope<ComparisonResult>>> {
    let base_code = request.base_stock.trim();
    if base_code.is_empty() {
        return Err(map_review_error(ReviewError::MissingParameter(
            "base_stock".to_string(),
        )));
    }
    let start = TradeDate::require(request.start_date.as_deref(), "start_date")
        .map_err(map_review_error)?;
    let end =
        TradeDate::require(request.end_date.as_deref(), "end_date").map_err(map_review_error)?;
    if start.as_str() > end.as_str() {
        return Err(map_review_error(ReviewError::InvalidFilter(format!(
            "起始日 {} 晚于截止日 {}",
            start, end
        ))));
    }
    if request.compare_stocks.len() > MAX_COMPARE_STOCKS {
        return Err(map_review_error(ReviewError::InvalidFilter(format!(
            "对比股票最多 {} 只",
            MAX_COMPARE_STOCKS
        ))));
    }
    let pool = state.db.as_ref().ok_or_else(db_unavailable)?;

    let base_stock = load_series(pool, base_code, &start, &end)
        .await
        .map_err(|e| map_review_error(e.into()))?;

    let mut compare_stocks = Vec::with_capacity(request.compare_stocks.len());
    for code in &request.compare_stocks {
        let code = code.trim();
        if code.is_empty() || code == base_code {
            continue;
        }
        let series = load_series(pool, code, &start, &end)
            .await
            .map_err(|e| map_review_error(e.into()))?;
        compare_stocks.push(series);
    }

    Ok(Json(DataEnvelope::new(ComparisonResult {
        base_stock,
        compare_stocks,
    })))
}

/// 股票对比路由。
pub fn compare_router() -> Router<Arc<AppState>> {
    Router::new().route("/stock/compare", post(stock_compare))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiErrorResponse;
    use crate::state::create_test_state;
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use tower::ServiceExt;

    async fn post_response(body: serde_json::Value) -> (StatusCode, ApiErrorResponse) {
        let app = compare_router().with_state(Arc::new(create_test_state()));
        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/stock/compare")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_empty_base_stock_is_422() {
        let (status, body) = post_response(serde_json::json!({
            "base_stock": "  ",
            "start_date": "20240101",
            "end_date": "20240131",
        }))
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.code, "MISSING_PARAMETER");
    }

    #[tokio::test]
    async fn test_inverted_range_is_422() {
        let (status, body) = post_response(serde_json::json!({
            "base_stock": "000001.SZ",
            "start_date": "20240131",
            "end_date": "20240101",
        }))
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.code, "INVALID_FILTER");
    }

    #[tokio::test]
    async fn test_too_many_compare_stocks_is_422() {
        let codes: Vec<String> = (0..6).map(|i| format!("00000{}.SZ", i)).collect();
        let (status, body) = post_response(serde_json::json!({
            "base_stock": "600000.SH",
            "compare_stocks": codes,
            "start_date": "20240101",
            "end_date": "20240131",
        }))
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.code, "INVALID_FILTER");
    }

    #[tokio::test]
    async fn test_valid_request_without_db_is_503() {
        let (status, body) = post_response(serde_json::json!({
            "base_stock": "000001.SZ",
            "compare_stocks": ["600519.SH"],
            "start_date": "2024-01-01",
            "end_date": "2024-01-31",
        }))
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.code, "DATA_SOURCE_UNAVAILABLE");
    }
}
