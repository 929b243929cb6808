//! 市场概览查询。
//!
//! 基准指数行情（上证指数、深证成指、创业板指）加全市场涨跌统计。
//! 指数行情带上市值与估值列（index_dailybasic），
//! 市值在出库后由元换算为亿元。

use crate::error::Result;
use review_core::sanitize;
use review_core::types::{TradeDate, BENCHMARK_INDICES};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// 基准指数单日行情与估值。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct IndexOverviewRow {
    pub ts_code: String,
    pub close: Option<f64>,
    pub change: Option<f64>,
    pub pct_chg: Option<f64>,
    pub vol: Option<f64>,
    pub amount: Option<f64>,
    pub turnover_rate: Option<f64>,
    /// 总市值（亿元）
    pub total_mv: Option<f64>,
    /// 流通市值（亿元）
    pub float_mv: Option<f64>,
    pub pe: Option<f64>,
    pub pe_ttm: Option<f64>,
    pub pb: Option<f64>,
}

/// 全市场涨跌面统计。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MarketStatsRow {
    pub up_count: Option<i64>,
    pub down_count: Option<i64>,
    pub limit_up_count: Option<i64>,
    pub limit_down_count: Option<i64>,
    pub up_5_percent: Option<i64>,
    pub down_5_percent: Option<i64>,
    pub total_amount: Option<f64>,
}

/// 市值列从元换算为亿元，估值倍数原样保留。
fn convert_market_caps(mut rows: Vec<IndexOverviewRow>) -> Vec<IndexOverviewRow> {
    for row in &mut rows {
        row.total_mv = row.total_mv.map(sanitize::yuan_to_yi);
        row.float_mv = row.float_mv.map(sanitize::yuan_to_yi);
    }
    rows
}

/// 查询基准指数单日行情与估值。
pub async fn benchmark_overview(pool: &PgPool, date: &TradeDate) -> Result<Vec<IndexOverviewRow>> {
    let codes: Vec<String> = BENCHMARK_INDICES.iter().map(|s| s.to_string()).collect();

    let rows = sqlx::query_as::<_, IndexOverviewRow>(
        r#"
        SELECT d.ts_code,
               d.close::float8 AS close,
               d.change::float8 AS change,
               d.pct_chg::float8 AS pct_chg,
               d.vol::float8 AS vol,
               d.amount::float8 AS amount,
               COALESCE(d.turnover_rate, b.turnover_rate)::float8 AS turnover_rate,
               b.total_mv::float8 AS total_mv,
               b.float_mv::float8 AS float_mv,
               b.pe::float8 AS pe,
               b.pe_ttm::float8 AS pe_ttm,
               b.pb::float8 AS pb
        FROM stock_daily d
        LEFT JOIN index_dailybasic b
               ON b.ts_code = d.ts_code AND b.trade_date = d.trade_date
        WHERE d.trade_date = $1
          AND d.ts_code = ANY($2)
        "#,
    )
    .bind(date.as_str())
    .bind(&codes)
    .fetch_all(pool)
    .await?;

    Ok(convert_market_caps(rows))
}

/// 查询全市场涨跌面统计。
pub async fn market_statistics(pool: &PgPool, date: &TradeDate) -> Result<MarketStatsRow> {
    let row = sqlx::query_as::<_, MarketStatsRow>(
        r#"
        SELECT
            COUNT(CASE WHEN pct_chg > 0 THEN 1 END) AS up_count,
            COUNT(CASE WHEN pct_chg < 0 THEN 1 END) AS down_count,
            COUNT(CASE WHEN pct_chg >= 9.5 THEN 1 END) AS limit_up_count,
            COUNT(CASE WHEN pct_chg <= -9.5 THEN 1 END) AS limit_down_count,
            COUNT(CASE WHEN pct_chg >= 5 THEN 1 END) AS up_5_percent,
            COUNT(CASE WHEN pct_chg <= -5 THEN 1 END) AS down_5_percent,
            SUM(amount)::float8 AS total_amount
        FROM stock_daily
        WHERE trade_date = $1
        "#,
    )
    .bind(date.as_str())
    .fetch_one(pool)
    .await?;

    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: serde_json::Value) -> IndexOverviewRow {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_market_caps_converted_to_yi() {
        // 上证总市值 52.3 万亿元
        let rows = convert_market_caps(vec![row(json!({
            "ts_code": "000001.SH",
            "close": 2900.0,
            "total_mv": 52_300_000_000_000.0_f64,
            "float_mv": 45_100_000_000_000.0_f64,
            "pe": 13.2,
            "pb": 1.25,
        }))]);

        assert_eq!(rows[0].total_mv, Some(523_000.0));
        assert_eq!(rows[0].float_mv, Some(451_000.0));
        // 估值倍数不换算
        assert_eq!(rows[0].pe, Some(13.2));
        assert_eq!(rows[0].pb, Some(1.25));
    }

    #[test]
    fn test_missing_valuation_stays_none() {
        let rows = convert_market_caps(vec![row(json!({"ts_code": "399006.SZ"}))]);
        assert_eq!(rows[0].total_mv, None);
        assert_eq!(rows[0].float_mv, None);
        assert_eq!(rows[0].pe_ttm, None);
    }
}
