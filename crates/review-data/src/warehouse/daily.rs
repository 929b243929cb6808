//! 个股日线与基础信息查询。
//!
//! 股票对比、周内规律分析的数据来源。

use crate::error::Result;
use review_core::types::TradeDate;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// 股票基础信息。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StockBasicRow {
    pub ts_code: String,
    pub name: Option<String>,
    pub industry: Option<String>,
    pub market: Option<String>,
}

/// 日线行情（联因子表的换手率、量比与情绪指标）。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DailyBarRow {
    pub trade_date: String,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub vol: Option<f64>,
    pub amount: Option<f64>,
    pub pct_chg: Option<f64>,
    pub turnover_rate_f: Option<f64>,
    pub volume_ratio: Option<f64>,
    pub brar_ar_bfq: Option<f64>,
    pub brar_br_bfq: Option<f64>,
    pub psy_bfq: Option<f64>,
    pub psyma_bfq: Option<f64>,
}

/// 个股在区间内的涨停/炸板事件。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct LimitEventRow {
    pub trade_date: String,
    /// U=涨停 D=跌停 Z=炸板
    pub limit: Option<String>,
    pub limit_times: Option<i32>,
}

/// 查询股票基础信息，不存在返回 None。
pub async fn stock_basic(pool: &PgPool, ts_code: &str) -> Result<Option<StockBasicRow>> {
    let row = sqlx::query_as::<_, StockBasicRow>(
        r#"
        SELECT ts_code, name, industry, market
        FROM stock_basic
        WHERE ts_code = $1
        "#,
    )
    .bind(ts_code)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// 查询闭区间 [start, end] 内的日线序列，日期升序。
pub async fn daily_bars(
    pool: &PgPool,
    ts_code: &str,
    start: &TradeDate,
    end: &TradeDate,
) -> Result<Vec<DailyBarRow>> {
    let rows = sqlx::query_as::<_, DailyBarRow>(
        r#"
        SELECT d.trade_date,
               d.open::float8 AS open,
               d.high::float8 AS high,
               d.low::float8 AS low,
               d.close::float8 AS close,
               d.vol::float8 AS vol,
               d.amount::float8 AS amount,
               d.pct_chg::float8 AS pct_chg,
               f.turnover_rate_f::float8 AS turnover_rate_f,
               f.volume_ratio::float8 AS volume_ratio,
               f.brar_ar_bfq::float8 AS brar_ar_bfq,
               f.brar_br_bfq::float8 AS brar_br_bfq,
               f.psy_bfq::float8 AS psy_bfq,
               f.psyma_bfq::float8 AS psyma_bfq
        FROM stock_daily d
        LEFT JOIN stk_factor_pro f ON d.ts_code = f.ts_code AND d.trade_date = f.trade_date
        WHERE d.ts_code = $1
          AND d.trade_date BETWEEN $2 AND $3
        ORDER BY d.trade_date
        "#,
    )
    .bind(ts_code)
    .bind(start.as_str())
    .bind(end.as_str())
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// 查询区间内的涨停/炸板事件，日期升序。
pub async fn limit_events(
    pool: &PgPool,
    ts_code: &str,
    start: &TradeDate,
    end: &TradeDate,
) -> Result<Vec<LimitEventRow>> {
    let rows = sqlx::query_as::<_, LimitEventRow>(
        r#"
        SELECT trade_date, "limit", limit_times::int4 AS limit_times
        FROM limit_list
        WHERE ts_code = $1
          AND trade_date BETWEEN $2 AND $3
        ORDER BY trade_date
        "#,
    )
    .bind(ts_code)
    .bind(start.as_str())
    .bind(end.as_str())
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
