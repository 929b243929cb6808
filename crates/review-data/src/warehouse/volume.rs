//! 量价查询。
//!
//! 市场总量、量比分布、量价异动股，以及个股量价分析的取数部分。
//! 异动过滤条件来自 [`VolumeAnomalyType`] 的固定查表，
//! 拼进 SQL 的只有枚举常量文本，调用方字符串永远走 `$n` 绑定。

use crate::error::Result;
use review_core::types::{TradeDate, VolumeAnomalyType};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

// ==================== 市场总量 ====================

/// 单日全市场成交总量（股）与总额。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MarketVolumeTotalsRow {
    pub trade_date: String,
    pub total_volume: Option<f64>,
    pub total_amount: Option<f64>,
}

/// 量比分布桶。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct VolumeDistributionRow {
    pub range: String,
    pub count: Option<i64>,
}

/// 量价异动股。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct VolumeAnomalyRow {
    pub code: String,
    pub name: Option<String>,
    pub price: Option<f64>,
    pub change_percent: Option<f64>,
    pub volume: Option<f64>,
    pub amount: Option<f64>,
    pub volume_ratio: Option<f64>,
}

/// 截至某日最近 20 个交易日的全市场成交总量，日期降序（首行即当日）。
pub async fn market_volume_totals(
    pool: &PgPool,
    date: &TradeDate,
) -> Result<Vec<MarketVolumeTotalsRow>> {
    let rows = sqlx::query_as::<_, MarketVolumeTotalsRow>(
        r#"
        SELECT
            trade_date,
            SUM(vol * 100)::float8 AS total_volume,
            SUM(amount)::float8 AS total_amount
        FROM stock_daily
        WHERE trade_date <= $1
        GROUP BY trade_date
        ORDER BY trade_date DESC
        LIMIT 20
        "#,
    )
    .bind(date.as_str())
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// 量比分布的固定区间，顺序即出参顺序。
const VOLUME_RATIO_BUCKETS: [&str; 6] =
    ["0.5倍以下", "0.5-1倍", "1-1.5倍", "1.5-2倍", "2倍以上", "未分类"];

/// 按固定区间归集量比。
///
/// 量比缺失（历史不足 5 日或均量为零）计入"未分类"，
/// 六个区间即使计数为零也都出现。
pub fn bucket_volume_ratios(ratios: &[Option<f64>]) -> Vec<VolumeDistributionRow> {
    let mut counts = [0i64; 6];
    for ratio in ratios {
        let idx = match ratio {
            Some(r) if r.is_finite() && *r >= 2.0 => 4,
            Some(r) if r.is_finite() && *r >= 1.5 => 3,
            Some(r) if r.is_finite() && *r >= 1.0 => 2,
            Some(r) if r.is_finite() && *r >= 0.5 => 1,
            Some(r) if r.is_finite() => 0,
            _ => 5,
        };
        counts[idx] += 1;
    }

    VOLUME_RATIO_BUCKETS
        .iter()
        .zip(counts)
        .map(|(range, count)| VolumeDistributionRow {
            range: (*range).to_string(),
            count: Some(count),
        })
        .collect()
}

/// 当日量比分布，六个固定区间（含"未分类"），顺序固定。
pub async fn volume_distribution(
    pool: &PgPool,
    date: &TradeDate,
) -> Result<Vec<VolumeDistributionRow>> {
    // 量比留到出库后归集，均量缺失或为零的行保持 NULL
    let ratios = sqlx::query_scalar::<_, Option<f64>>(
        r#"
        WITH base_stats AS (
            SELECT
                d.ts_code,
                d.trade_date,
                d.vol * 100 AS volume,
                AVG(d.vol * 100) OVER (
                    PARTITION BY d.ts_code
                    ORDER BY d.trade_date DESC
                    ROWS BETWEEN 1 FOLLOWING AND 5 FOLLOWING
                ) AS avg_vol_5
            FROM stock_daily d
            WHERE d.trade_date <= $1
        )
        SELECT (volume / NULLIF(avg_vol_5, 0))::float8 AS ratio
        FROM base_stats
        WHERE trade_date = $1
        "#,
    )
    .bind(date.as_str())
    .fetch_all(pool)
    .await?;

    Ok(bucket_volume_ratios(&ratios))
}

/// 命中某个异动类型的个股，按涨跌幅绝对值降序，最多 100 只。
///
/// 量比 = 当日成交量 ÷ 此前 5 个交易日均量（不含当日）。
pub async fn anomaly_stocks(
    pool: &PgPool,
    date: &TradeDate,
    anomaly: VolumeAnomalyType,
) -> Result<Vec<VolumeAnomalyRow>> {
    // 条件文本是枚举内的 &'static str 常量，不是调用方输入
    let sql = format!(
        r#"
        WITH base_stats AS (
            SELECT
                d.ts_code,
                d.trade_date,
                d.vol * 100 AS volume,
                d.close,
                d.pct_chg,
                d.amount,
                s.name,
                AVG(d.vol * 100) OVER (
                    PARTITION BY d.ts_code
                    ORDER BY d.trade_date DESC
                    ROWS BETWEEN 1 FOLLOWING AND 5 FOLLOWING
                ) AS avg_vol_5
            FROM stock_daily d
            JOIN stock_basic s ON d.ts_code = s.ts_code
            WHERE d.trade_date <= $1
        ),
        volume_stats AS (
            SELECT
                ts_code,
                name,
                close,
                pct_chg,
                volume,
                amount,
                volume / NULLIF(avg_vol_5, 0) AS volume_ratio
            FROM base_stats
            WHERE trade_date = $1
        )
        SELECT
            ts_code AS code,
            name,
            close::float8 AS price,
            pct_chg::float8 AS change_percent,
            volume::float8 AS volume,
            amount::float8 AS amount,
            volume_ratio::float8 AS volume_ratio
        FROM volume_stats
        WHERE {}
        ORDER BY ABS(pct_chg) DESC
        LIMIT 100
        "#,
        anomaly.sql_condition()
    );

    let rows = sqlx::query_as::<_, VolumeAnomalyRow>(&sql)
        .bind(date.as_str())
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

// ==================== 个股量价分析取数 ====================

/// 个股当日量价基础数据（带昨日量与 5 日均量）。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StockVolumeBasicRow {
    pub ts_code: String,
    pub trade_date: String,
    pub close: Option<f64>,
    pub vol: Option<f64>,
    pub amount: Option<f64>,
    pub pct_chg: Option<f64>,
    pub pre_vol: Option<f64>,
    pub avg_vol_5d: Option<f64>,
}

/// 个股当日资金流向。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MoneyFlowRow {
    pub ts_code: String,
    pub net_amount: Option<f64>,
    pub net_amount_rate: Option<f64>,
}

/// 个股当日因子快照（量比、MFI 等，分类器输入）。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StockFactorRow {
    pub ts_code: String,
    pub volume_ratio: Option<f64>,
    pub mfi_qfq: Option<f64>,
    pub rsi_qfq_6: Option<f64>,
    pub macd_qfq: Option<f64>,
    pub kdj_k_qfq: Option<f64>,
    pub kdj_d_qfq: Option<f64>,
    pub kdj_j_qfq: Option<f64>,
}

/// 个股 K 线窗口。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StockKlineRow {
    pub trade_date: String,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
    pub amount: Option<f64>,
}

/// 一批个股的当日量价基础数据。
pub async fn volume_basic_data(
    pool: &PgPool,
    ts_codes: &[String],
    date: &TradeDate,
) -> Result<Vec<StockVolumeBasicRow>> {
    let rows = sqlx::query_as::<_, StockVolumeBasicRow>(
        r#"
        WITH hist_data AS (
            SELECT
                ts_code,
                trade_date,
                close::float8 AS close,
                vol::float8 AS vol,
                amount::float8 AS amount,
                pct_chg::float8 AS pct_chg,
                LAG(vol, 1) OVER (PARTITION BY ts_code ORDER BY trade_date)::float8 AS pre_vol,
                AVG(vol) OVER (
                    PARTITION BY ts_code
                    ORDER BY trade_date
                    ROWS BETWEEN 5 PRECEDING AND 1 PRECEDING
                )::float8 AS avg_vol_5d
            FROM stock_daily
            WHERE ts_code = ANY($1)
              AND trade_date <= $2
        )
        SELECT * FROM hist_data WHERE trade_date = $2
        "#,
    )
    .bind(ts_codes)
    .bind(date.as_str())
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// 一批个股的当日资金流向。
pub async fn money_flow(
    pool: &PgPool,
    ts_codes: &[String],
    date: &TradeDate,
) -> Result<Vec<MoneyFlowRow>> {
    let rows = sqlx::query_as::<_, MoneyFlowRow>(
        r#"
        SELECT ts_code,
               net_amount::float8 AS net_amount,
               net_amount_rate::float8 AS net_amount_rate
        FROM moneyflow_dc
        WHERE ts_code = ANY($1)
          AND trade_date = $2
        "#,
    )
    .bind(ts_codes)
    .bind(date.as_str())
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// 一批个股的当日因子快照。
pub async fn factor_snapshot(
    pool: &PgPool,
    ts_codes: &[String],
    date: &TradeDate,
) -> Result<Vec<StockFactorRow>> {
    let rows = sqlx::query_as::<_, StockFactorRow>(
        r#"
        SELECT
            ts_code,
            volume_ratio::float8 AS volume_ratio,
            mfi_qfq::float8 AS mfi_qfq,
            rsi_qfq_6::float8 AS rsi_qfq_6,
            macd_qfq::float8 AS macd_qfq,
            kdj_k_qfq::float8 AS kdj_k_qfq,
            kdj_d_qfq::float8 AS kdj_d_qfq,
            kdj_j_qfq::float8 AS kdj_j_qfq
        FROM stock_factor_pro
        WHERE ts_code = ANY($1)
          AND trade_date = $2
        "#,
    )
    .bind(ts_codes)
    .bind(date.as_str())
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// 个股截至某日最近 `limit` 个交易日的 K 线，日期降序（首行即当日）。
pub async fn stock_kline_window(
    pool: &PgPool,
    ts_code: &str,
    end_date: &TradeDate,
    limit: i64,
) -> Result<Vec<StockKlineRow>> {
    let rows = sqlx::query_as::<_, StockKlineRow>(
        r#"
        SELECT
            trade_date,
            open::float8 AS open,
            high::float8 AS high,
            low::float8 AS low,
            close::float8 AS close,
            vol::float8 AS volume,
            amount::float8 AS amount
        FROM stock_daily
        WHERE ts_code = $1
          AND trade_date <= $2
        ORDER BY trade_date DESC
        LIMIT $3
        "#,
    )
    .bind(ts_code)
    .bind(end_date.as_str())
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
