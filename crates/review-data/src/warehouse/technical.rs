//! 技术指标查询。
//!
//! 指标都是仓库预计算列，这里只取数，不计算。

use crate::error::Result;
use review_core::types::TradeDate;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// 龙虎榜个股的当日技术指标快照。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TechnicalRow {
    pub ts_code: String,
    pub close: Option<f64>,
    pub macd_bfq: Option<f64>,
    pub macd_dea_bfq: Option<f64>,
    pub macd_dif_bfq: Option<f64>,
    pub kdj_k_bfq: Option<f64>,
    pub kdj_d_bfq: Option<f64>,
    pub kdj_bfq: Option<f64>,
    pub rsi_bfq_6: Option<f64>,
    pub rsi_bfq_12: Option<f64>,
    pub rsi_bfq_24: Option<f64>,
    pub boll_upper_bfq: Option<f64>,
    pub boll_mid_bfq: Option<f64>,
    pub boll_lower_bfq: Option<f64>,
    pub ma_bfq_5: Option<f64>,
    pub ma_bfq_10: Option<f64>,
    pub ma_bfq_20: Option<f64>,
    pub ma_bfq_60: Option<f64>,
    pub vol: Option<f64>,
    pub amount: Option<f64>,
    pub turnover_rate: Option<f64>,
}

/// 单只个股某日的全量指标行（含价格与波动指标），按日期升序取窗口。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TechnicalFactorRow {
    pub trade_date: String,
    pub ma_bfq_5: Option<f64>,
    pub ma_bfq_10: Option<f64>,
    pub ma_bfq_20: Option<f64>,
    pub ma_bfq_60: Option<f64>,
    pub macd_bfq: Option<f64>,
    pub macd_dif_bfq: Option<f64>,
    pub macd_dea_bfq: Option<f64>,
    pub boll_upper_bfq: Option<f64>,
    pub boll_mid_bfq: Option<f64>,
    pub boll_lower_bfq: Option<f64>,
    pub kdj_k_bfq: Option<f64>,
    pub kdj_d_bfq: Option<f64>,
    pub kdj_bfq: Option<f64>,
    pub rsi_bfq_6: Option<f64>,
    pub rsi_bfq_12: Option<f64>,
    pub rsi_bfq_24: Option<f64>,
    pub vol: Option<f64>,
    pub amount: Option<f64>,
    pub turnover_rate: Option<f64>,
    pub turnover_rate_f: Option<f64>,
    pub atr_bfq: Option<f64>,
    pub bias1_bfq: Option<f64>,
    pub bias2_bfq: Option<f64>,
    pub bias3_bfq: Option<f64>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub pct_chg: Option<f64>,
}

/// 当日龙虎榜个股的技术指标。
pub async fn technical_for_top_list(pool: &PgPool, date: &TradeDate) -> Result<Vec<TechnicalRow>> {
    let rows = sqlx::query_as::<_, TechnicalRow>(
        r#"
        SELECT
            ts_code,
            close::float8 AS close,
            macd_bfq::float8 AS macd_bfq,
            macd_dea_bfq::float8 AS macd_dea_bfq,
            macd_dif_bfq::float8 AS macd_dif_bfq,
            kdj_k_bfq::float8 AS kdj_k_bfq,
            kdj_d_bfq::float8 AS kdj_d_bfq,
            kdj_bfq::float8 AS kdj_bfq,
            rsi_bfq_6::float8 AS rsi_bfq_6,
            rsi_bfq_12::float8 AS rsi_bfq_12,
            rsi_bfq_24::float8 AS rsi_bfq_24,
            boll_upper_bfq::float8 AS boll_upper_bfq,
            boll_mid_bfq::float8 AS boll_mid_bfq,
            boll_lower_bfq::float8 AS boll_lower_bfq,
            ma_bfq_5::float8 AS ma_bfq_5,
            ma_bfq_10::float8 AS ma_bfq_10,
            ma_bfq_20::float8 AS ma_bfq_20,
            ma_bfq_60::float8 AS ma_bfq_60,
            vol::float8 AS vol,
            amount::float8 AS amount,
            turnover_rate::float8 AS turnover_rate
        FROM stk_factor_pro
        WHERE trade_date = $1
          AND ts_code IN (
              SELECT ts_code FROM top_list WHERE trade_date = $1
          )
        "#,
    )
    .bind(date.as_str())
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// 单只个股截至 `end_date` 的 `period` 个交易日指标窗口，日期升序。
pub async fn technical_window(
    pool: &PgPool,
    ts_code: &str,
    end_date: &TradeDate,
    period: i64,
) -> Result<Vec<TechnicalFactorRow>> {
    let rows = sqlx::query_as::<_, TechnicalFactorRow>(
        r#"
        WITH date_range AS (
            SELECT trade_date
            FROM stk_factor_pro
            WHERE ts_code = $1
              AND trade_date <= $2
            ORDER BY trade_date DESC
            LIMIT $3
        )
        SELECT
            trade_date,
            ma_bfq_5::float8 AS ma_bfq_5,
            ma_bfq_10::float8 AS ma_bfq_10,
            ma_bfq_20::float8 AS ma_bfq_20,
            ma_bfq_60::float8 AS ma_bfq_60,
            macd_bfq::float8 AS macd_bfq,
            macd_dif_bfq::float8 AS macd_dif_bfq,
            macd_dea_bfq::float8 AS macd_dea_bfq,
            boll_upper_bfq::float8 AS boll_upper_bfq,
            boll_mid_bfq::float8 AS boll_mid_bfq,
            boll_lower_bfq::float8 AS boll_lower_bfq,
            kdj_k_bfq::float8 AS kdj_k_bfq,
            kdj_d_bfq::float8 AS kdj_d_bfq,
            kdj_bfq::float8 AS kdj_bfq,
            rsi_bfq_6::float8 AS rsi_bfq_6,
            rsi_bfq_12::float8 AS rsi_bfq_12,
            rsi_bfq_24::float8 AS rsi_bfq_24,
            vol::float8 AS vol,
            amount::float8 AS amount,
            turnover_rate::float8 AS turnover_rate,
            turnover_rate_f::float8 AS turnover_rate_f,
            atr_bfq::float8 AS atr_bfq,
            bias1_bfq::float8 AS bias1_bfq,
            bias2_bfq::float8 AS bias2_bfq,
            bias3_bfq::float8 AS bias3_bfq,
            open::float8 AS open,
            high::float8 AS high,
            low::float8 AS low,
            close::float8 AS close,
            pct_chg::float8 AS pct_chg
        FROM stk_factor_pro
        WHERE ts_code = $1
          AND trade_date IN (SELECT trade_date FROM date_range)
        ORDER BY trade_date ASC
        "#,
    )
    .bind(ts_code)
    .bind(end_date.as_str())
    .bind(period)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// 查询个股在仓库中的最新交易日。
pub async fn latest_factor_date(pool: &PgPool, ts_code: &str) -> Result<Option<String>> {
    let row: (Option<String>,) = sqlx::query_as(
        "SELECT MAX(trade_date) FROM stk_factor_pro WHERE ts_code = $1",
    )
    .bind(ts_code)
    .fetch_one(pool)
    .await?;

    Ok(row.0)
}
