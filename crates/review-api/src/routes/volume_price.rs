//! 量价分析端点。
//!
//! 市场量能、量比分布、按异动类型筛选的个股列表，
//! 以及单股的多标签异动分类与 K 线窗口。

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use review_analytics::{classify, Anomaly, AnomalyInput};
use review_core::types::{MarketBoard, TsCode, VolumeAnomalyType};
use review_core::{sanitize, ReviewError, TradeDate};
use review_data::warehouse;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{db_unavailable, map_review_error, ApiResult, DataEnvelope};
use crate::state::AppState;

use super::review::DateParams;

/// 当日市场量能摘要。
#[derive(Debug, Serialize, Deserialize)]
pub struct VolumeSummary {
    /// 当日成交总量（股）
    pub total_volume: f64,
    /// 当日成交总额（亿元）
    pub total_amount: f64,
    pub avg_volume_5: f64,
    pub avg_volume_10: f64,
    pub avg_volume_20: f64,
    /// 当日总量 ÷ 5 日均量
    pub volume_ratio: Option<f64>,
}

/// 市场量能响应：当日摘要、近 20 日总量与当日量比分布。
#[derive(Debug, Serialize, Deserialize)]
pub struct MarketVolumeResponse {
    pub date: String,
    pub summary: Option<VolumeSummary>,
    pub totals: Vec<warehouse::MarketVolumeTotalsRow>,
    pub distribution: Vec<warehouse::VolumeDistributionRow>,
}

/// 从日期降序的总量序列算出当日摘要（首行即当日）。
///
/// 总额由千元换算为亿元；历史不足 N 日时均量按现有行数取均。
fn summarize_market_volume(totals: &[warehouse::MarketVolumeTotalsRow]) -> Option<VolumeSummary> {
    let today = totals.first()?;

    let avg = |n: usize| {
        let window = &totals[..totals.len().min(n)];
        let sum: f64 = window
            .iter()
            .map(|r| sanitize::clean_or_zero(r.total_volume))
            .sum();
        sanitize::round2(sum / window.len() as f64)
    };

    let total_volume = sanitize::clean_or_zero(today.total_volume);
    let avg_volume_5 = avg(5);
    let volume_ratio = (avg_volume_5 > 0.0).then(|| sanitize::round2(total_volume / avg_volume_5));

    Some(VolumeSummary {
        total_volume,
        total_amount: sanitize::thousand_yuan_to_yi(sanitize::clean_or_zero(today.total_amount)),
        avg_volume_5,
        avg_volume_10: avg(10),
        avg_volume_20: avg(20),
        volume_ratio,
    })
}

/// GET /volume/market?date=
pub async fn market_volume(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DateParams>,
) -> ApiResult<Json<DataEnvelope<MarketVolumeResponse>>> {
    let date = TradeDate::require(params.date.as_deref(), "date").map_err(map_review_error)?;
    let pool = state.db.as_ref().ok_or_else(db_unavailable)?;

    let (totals, distribution) = tokio::try_join!(
        warehouse::market_volume_totals(pool, &date),
        warehouse::volume_distribution(pool, &date),
    )
    .map_err(|e| map_review_error(e.into()))?;

    let summary = summarize_market_volume(&totals);

    Ok(Json(DataEnvelope::new(MarketVolumeResponse {
        date: date.as_str().to_string(),
        summary,
        totals,
        distribution,
    })))
}

/// 异动筛选参数。
#[derive(Debug, Deserialize)]
pub struct AnomalyParams {
    pub date: Option<String>,
    /// 异动类型（volume_up / volume_down / volume_decrease_up / volume_decrease_down）
    pub anomaly_type: Option<String>,
}

/// GET /volume/anomaly?date=&anomaly_type=
///
/// 类型只接受枚举内的四个值，枚举外一律 422，不拼进 SQL。
pub async fn anomaly_list(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AnomalyParams>,
) -> ApiResult<Json<DataEnvelope<Vec<warehouse::VolumeAnomalyRow>>>> {
    let date = TradeDate::require(params.date.as_deref(), "date").map_err(map_review_error)?;
    let raw_type = params
        .anomaly_type
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| {
            map_review_error(ReviewError::MissingParameter("anomaly_type".to_string()))
        })?;
    let anomaly = VolumeAnomalyType::from_str(raw_type).map_err(map_review_error)?;
    let pool = state.db.as_ref().ok_or_else(db_unavailable)?;

    let rows = warehouse::anomaly_stocks(pool, &date, anomaly)
        .await
        .map_err(|e| map_review_error(e.into()))?;
    Ok(Json(DataEnvelope::new(rows)))
}

/// 单股量价分析响应。
#[derive(Debug, Serialize, Deserialize)]
pub struct StockVolumeResponse {
    pub ts_code: String,
    pub date: String,
    pub board: MarketBoard,
    pub basic: Option<warehouse::StockVolumeBasicRow>,
    /// 当日成交量（股，vol 列以手计）
    pub volume_shares: Option<f64>,
    /// 当日成交额（亿元，amount 列以千元计）
    pub amount_yi: Option<f64>,
    pub money_flow: Option<warehouse::MoneyFlowRow>,
    pub anomalies: Vec<Anomaly>,
}

/// 展示单位换算：手→股、千元→亿元。
fn stock_display_units(
    basic: Option<&warehouse::StockVolumeBasicRow>,
) -> (Option<f64>, Option<f64>) {
    let volume_shares = basic.and_then(|b| b.vol.map(sanitize::lots_to_shares));
    let amount_yi = basic.and_then(|b| b.amount.map(sanitize::thousand_yuan_to_yi));
    (volume_shares, amount_yi)
}

/// GET /volume/stock/{ts_code}?date=
///
/// 三类行各自缺失都不报错，只是相应规则不触发。
pub async fn stock_volume(
    State(state): State<Arc<AppState>>,
    Path(ts_code): Path<String>,
    Query(params): Query<DateParams>,
) -> ApiResult<Json<DataEnvelope<StockVolumeResponse>>> {
    let date = TradeDate::require(params.date.as_deref(), "date").map_err(map_review_error)?;
    let pool = state.db.as_ref().ok_or_else(db_unavailable)?;

    let codes = vec![ts_code.clone()];
    let (basics, flows, factors) = tokio::try_join!(
        warehouse::volume_basic_data(pool, &codes, &date),
        warehouse::money_flow(pool, &codes, &date),
        warehouse::factor_snapshot(pool, &codes, &date),
    )
    .map_err(|e| map_review_error(e.into()))?;

    let basic = basics.into_iter().next();
    let flow = flows.into_iter().next();
    let factor = factors.into_iter().next();

    let input = AnomalyInput::from_rows(basic.as_ref(), flow.as_ref(), factor.as_ref());
    let anomalies = classify(&input);
    let (volume_shares, amount_yi) = stock_display_units(basic.as_ref());
    let board = TsCode::from(ts_code.as_str()).board();

    Ok(Json(DataEnvelope::new(StockVolumeResponse {
        ts_code,
        date: date.as_str().to_string(),
        board,
        basic,
        volume_shares,
        amount_yi,
        money_flow: flow,
        anomalies,
    })))
}

/// K 线窗口参数。
#[derive(Debug, Deserialize)]
pub struct KlineParams {
    pub date: Option<String>,
    /// 回看交易日数，默认 60
    pub period: Option<i64>,
}

/// GET /kline/{ts_code}?date=&period=
pub async fn stock_kline(
    State(state): State<Arc<AppState>>,
    Path(ts_code): Path<String>,
    Query(params): Query<KlineParams>,
) -> ApiResult<Json<DataEnvelope<Vec<warehouse::StockKlineRow>>>> {
    let date = TradeDate::require(params.date.as_deref(), "date").map_err(map_review_error)?;
    let period = params.period.unwrap_or(60).clamp(1, 500);
    let pool = state.db.as_ref().ok_or_else(db_unavailable)?;

    let rows = warehouse::stock_kline_window(pool, &ts_code, &date, period)
        .await
        .map_err(|e| map_review_error(e.into()))?;
    Ok(Json(DataEnvelope::new(rows)))
}

/// 量价分析路由。
pub fn volume_price_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/volume/market", get(market_volume))
        .route("/volume/anomaly", get(anomaly_list))
        .route("/volume/stock/{ts_code}", get(stock_volume))
        .route("/kline/{ts_code}", get(stock_kline))
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
        let app = volume_price_router().with_state(Arc::new(create_test_state()));
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
    async fn test_unknown_anomaly_type_is_422() {
        let (status, body) =
            get_response("/volume/anomaly?date=20240105&anomaly_type=bogus").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.code, "INVALID_FILTER");
    }

    #[tokio::test]
    async fn test_missing_anomaly_type_is_422() {
        let (status, body) = get_response("/volume/anomaly?date=20240105").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.code, "MISSING_PARAMETER");
    }

    #[tokio::test]
    async fn test_known_anomaly_type_passes_validation() {
        let (status, body) =
            get_response("/volume/anomaly?date=20240105&anomaly_type=volume_up").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.code, "DATA_SOURCE_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_kline_requires_valid_date() {
        let (status, body) = get_response("/kline/000001.SZ?date=2024/01/05").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.code, "INVALID_DATE_FORMAT");
    }

    /// 日期降序的合成序列：当日量 2000 股，其余每日 1000 股。
    fn synthetic_totals(days: usize) -> Vec<warehouse::MarketVolumeTotalsRow> {
        (0..days)
            .map(|i| warehouse::MarketVolumeTotalsRow {
                trade_date: format!("202401{:02}", days - i),
                total_volume: Some(if i == 0 { 2000.0 } else { 1000.0 }),
                total_amount: Some(500_000.0),
            })
            .collect()
    }

    #[test]
    fn test_volume_summary_over_twenty_days() {
        let summary = summarize_market_volume(&synthetic_totals(20)).unwrap();

        assert_eq!(summary.total_volume, 2000.0);
        // 500000 千元 = 5 亿元
        assert_eq!(summary.total_amount, 5.0);
        // 5 日窗口：2000 + 4×1000
        assert_eq!(summary.avg_volume_5, 1200.0);
        assert_eq!(summary.avg_volume_10, 1100.0);
        assert_eq!(summary.avg_volume_20, 1050.0);
        assert_eq!(summary.volume_ratio, Some(1.67));
    }

    #[test]
    fn test_volume_summary_short_history() {
        // 新市场只有 3 日历史，均量按现有行数取均
        let summary = summarize_market_volume(&synthetic_totals(3)).unwrap();
        let expected: f64 = (2000.0 + 1000.0 + 1000.0) / 3.0;
        assert_eq!(summary.avg_volume_5, (expected * 100.0).round() / 100.0);
        assert_eq!(summary.avg_volume_20, summary.avg_volume_5);
    }

    #[test]
    fn test_volume_summary_empty_is_none() {
        assert!(summarize_market_volume(&[]).is_none());
    }

    #[test]
    fn test_stock_display_units() {
        let basic: warehouse::StockVolumeBasicRow = serde_json::from_value(serde_json::json!({
            "ts_code": "300750.SZ",
            "trade_date": "20240105",
            "vol": 150_000.0,
            "amount": 1_230_000.0,
        }))
        .unwrap();

        let (volume_shares, amount_yi) = stock_display_units(Some(&basic));
        // 15 万手 = 1500 万股；123 万千元 = 12.3 亿元
        assert_eq!(volume_shares, Some(15_000_000.0));
        assert_eq!(amount_yi, Some(12.3));

        assert_eq!(stock_display_units(None), (None, None));
    }

    #[test]
    fn test_stock_response_carries_board() {
        let response = StockVolumeResponse {
            ts_code: "300750.SZ".to_string(),
            date: "20240105".to_string(),
            board: TsCode::from("300750.SZ").board(),
            basic: None,
            volume_shares: None,
            amount_yi: None,
            money_flow: None,
            anomalies: vec![],
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["board"], "chi_next");
    }
}
