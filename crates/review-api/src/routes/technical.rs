//! 技术指标端点。
//!
//! `/technical` 是当日龙虎榜个股的指标快照；
//! `/technical/{ts_code}` 是单股指标窗口的分组标注报表。

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use review_analytics::{annotate_window, TechnicalReport};
use review_core::TradeDate;
use review_data::warehouse;
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{db_unavailable, map_review_error, ApiResult, DataEnvelope};
use crate::state::AppState;

use super::review::DateParams;

/// GET /technical?date=
pub async fn top_list_technical(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DateParams>,
) -> ApiResult<Json<DataEnvelope<Vec<warehouse::TechnicalRow>>>> {
    let date = TradeDate::require(params.date.as_deref(), "date").map_err(map_review_error)?;
    let pool = state.db.as_ref().ok_or_else(db_unavailable)?;

    let rows = warehouse::technical_for_top_list(pool, &date)
        .await
        .map_err(|e| map_review_error(e.into()))?;
    Ok(Json(DataEnvelope::new(rows)))
}

/// 指标窗口参数。
#[derive(Debug, Deserialize)]
pub struct TechnicalParams {
    /// 窗口截止日，缺省取该股最近有指标的交易日
    pub date: Option<String>,
    /// 窗口长度（交易日数），默认 90
    pub period: Option<i64>,
}

/// GET /technical/{ts_code}?date=&period=
pub async fn stock_technical(
    State(state): State<Arc<AppState>>,
    Path(ts_code): Path<String>,
    Query(params): Query<TechnicalParams>,
) -> ApiResult<Json<DataEnvelope<TechnicalReport>>> {
    let explicit = TradeDate::parse_opt(params.date.as_deref()).map_err(map_review_error)?;
    let period = params.period.unwrap_or(90).clamp(1, 365);
    let pool = state.db.as_ref().ok_or_else(db_unavailable)?;

    let end_date = match explicit {
        Some(date) => Some(date),
        None => {
            // 该股最近一个有指标数据的交易日
            let latest = warehouse::latest_factor_date(pool, &ts_code)
                .await
                .map_err(|e| map_review_error(e.into()))?;
            match latest {
                Some(raw) => Some(TradeDate::normalize(&raw).map_err(map_review_error)?),
                None => None,
            }
        }
    };

    let rows = match end_date {
        Some(ref date) => warehouse::technical_window(pool, &ts_code, date, period)
            .await
            .map_err(|e| map_review_error(e.into()))?,
        // 完全没有指标数据：空报表是正常结果
        None => Vec::new(),
    };

    Ok(Json(DataEnvelope::new(annotate_window(
        &ts_code, period, &rows,
    ))))
}

/// 技术指标路由。
pub fn technical_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/technical", get(top_list_technical))
        .route("/technical/{ts_code}", get(stock_technical))
}
