//! 涨停板查询。
//!
//! 涨停板列表本身，加上涨停分析报表的十个分项查询。
//! 所有调用方输入只通过 `$n` 占位符进入 SQL。

use crate::error::Result;
use review_core::{ReviewError, ReviewResult, TradeDate};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::cmp::Ordering;

// ==================== 涨停板列表 ====================

/// 涨停板条目（涨停主表联打板明细）。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct LimitUpRow {
    pub ts_code: String,
    pub name: Option<String>,
    pub trade_date: String,
    /// 连板数
    pub limit_times: Option<i32>,
    /// 首次封板时间
    pub lu_time: Option<String>,
    pub open_time: Option<String>,
    pub last_time: Option<String>,
    pub lu_desc: Option<String>,
    pub theme: Option<String>,
    pub status: Option<String>,
    pub net_change: Option<f64>,
    pub pct_chg: Option<f64>,
    pub amount: Option<f64>,
    pub turnover_rate: Option<f64>,
    pub bid_amount: Option<f64>,
    pub bid_turnover: Option<f64>,
    pub free_float: Option<f64>,
    pub lu_limit_order: Option<f64>,
}

/// 校验涨停统计过滤串，合法形如 "3/5"（M 天 N 板）。
pub fn validate_up_stat(raw: &str) -> ReviewResult<()> {
    let mut parts = raw.split('/');
    let valid = matches!(
        (parts.next(), parts.next(), parts.next()),
        (Some(a), Some(b), None)
            if !a.is_empty()
                && !b.is_empty()
                && a.bytes().all(|c| c.is_ascii_digit())
                && b.bytes().all(|c| c.is_ascii_digit())
    );
    if valid {
        Ok(())
    } else {
        Err(ReviewError::InvalidFilter(format!(
            "涨停统计 {} 非法，应为 \"N板/M天\" 形式，如 3/5",
            raw
        )))
    }
}

/// 涨停板固定排序：连板数降序，封板时间升序，时间缺失排最后。
pub fn sort_limit_board(rows: &mut [LimitUpRow]) {
    rows.sort_by(|a, b| {
        let times = b.limit_times.unwrap_or(0).cmp(&a.limit_times.unwrap_or(0));
        if times != Ordering::Equal {
            return times;
        }
        match (&a.lu_time, &b.lu_time) {
            (Some(x), Some(y)) => x.cmp(y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
}

/// 查询某日涨停板。
///
/// 可选过滤：最小连板数、涨停统计串（调用前须通过 [`validate_up_stat`]）。
pub async fn limit_up_board(
    pool: &PgPool,
    date: &TradeDate,
    min_limit_times: Option<i32>,
    up_stat: Option<&str>,
) -> Result<Vec<LimitUpRow>> {
    let mut rows = sqlx::query_as::<_, LimitUpRow>(
        r#"
        SELECT DISTINCT
            l.ts_code,
            l.name,
            l.trade_date,
            l.limit_times::int4 AS limit_times,
            k.lu_time,
            k.open_time,
            k.last_time,
            k.lu_desc,
            k.theme,
            k.status,
            k.net_change::float8 AS net_change,
            k.pct_chg::float8 AS pct_chg,
            k.amount::float8 AS amount,
            k.turnover_rate::float8 AS turnover_rate,
            k.bid_amount::float8 AS bid_amount,
            k.bid_turnover::float8 AS bid_turnover,
            k.free_float::float8 AS free_float,
            k.lu_limit_order::float8 AS lu_limit_order
        FROM limit_list_d l
        LEFT JOIN kpl_list k ON l.ts_code = k.ts_code
            AND l.trade_date = k.trade_date
        WHERE l.trade_date = $1
          AND l.limit = 'U'
          AND ($2::int4 IS NULL OR l.limit_times >= $2)
          AND ($3::text IS NULL OR l.up_stat = $3)
        "#,
    )
    .bind(date.as_str())
    .bind(min_limit_times)
    .bind(up_stat)
    .fetch_all(pool)
    .await?;

    sort_limit_board(&mut rows);
    Ok(rows)
}

// ==================== 涨停分析分项 ====================

/// 连板分布：每个连板数对应的家数。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct LimitStatsRow {
    pub limit_times: Option<i32>,
    pub count: Option<i64>,
}

/// 行业涨停分布。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct IndustryDistRow {
    pub industry: Option<String>,
    pub limit_up_count: Option<i64>,
    pub stock_names: Option<String>,
}

/// 最强涨停股（按封单金额）。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StrongestRow {
    pub ts_code: String,
    pub name: Option<String>,
    pub industry: Option<String>,
    pub fd_amount: Option<f64>,
    pub limit_times: Option<i32>,
    pub turnover_ratio: Option<f64>,
    pub up_stat: Option<String>,
}

/// 最快涨停股（按首次封板时间）。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FastestRow {
    pub ts_code: String,
    pub name: Option<String>,
    pub industry: Option<String>,
    pub first_time: Option<String>,
    pub fd_amount: Option<f64>,
    pub limit_times: Option<i32>,
}

/// 尾盘封板股（14:30 以后封板）。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct LastHitRow {
    pub ts_code: String,
    pub name: Option<String>,
    pub industry: Option<String>,
    pub last_time: Option<String>,
    pub fd_amount: Option<f64>,
    pub limit_times: Option<i32>,
}

/// 炸板股（封板后打开）。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BrokenBoardRow {
    pub ts_code: String,
    pub name: Option<String>,
    pub industry: Option<String>,
    pub open_times: Option<i32>,
    pub first_time: Option<String>,
    pub pct_chg: Option<f64>,
}

/// 异动股：成交额放大 3 倍以上或换手率超 15%。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AbnormalMoveRow {
    pub ts_code: String,
    pub name: Option<String>,
    pub industry: Option<String>,
    pub amount: Option<f64>,
    pub turnover_ratio: Option<f64>,
    pub pct_chg: Option<f64>,
    pub amount_ratio: Option<f64>,
    pub turnover_ratio_change: Option<f64>,
}

/// 近 10 日连板趋势。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BoardTrendRow {
    pub trade_date: String,
    pub first_board: Option<i64>,
    pub second_board: Option<i64>,
    pub third_plus_board: Option<i64>,
    pub broken_board: Option<i64>,
}

/// 5 日强势股（连续 3 天以上强势）。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StrongStockRow {
    pub ts_code: String,
    pub name: Option<String>,
    pub industry: Option<String>,
    pub up_days: Option<i64>,
    pub total_gain: Option<f64>,
    /// 走势串，如 "涨停->5.20%->炸板"
    pub trend: Option<String>,
}

/// 板块联动：涨停 2 家以上的行业。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SectorLinkageRow {
    pub industry: Option<String>,
    pub stock_count: Option<i64>,
    pub limit_up_count: Option<i64>,
    pub avg_change: Option<f64>,
    pub limit_up_stocks: Option<String>,
    pub limit_up_ratio: Option<f64>,
}

/// 连板分布统计。
pub async fn limit_stats(pool: &PgPool, date: &TradeDate) -> Result<Vec<LimitStatsRow>> {
    let rows = sqlx::query_as::<_, LimitStatsRow>(
        r#"
        SELECT limit_times::int4 AS limit_times, COUNT(*) AS count
        FROM limit_list
        WHERE trade_date = $1 AND "limit" = 'U'
        GROUP BY limit_times
        ORDER BY limit_times
        "#,
    )
    .bind(date.as_str())
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// 行业涨停分布前 10。
pub async fn industry_distribution(pool: &PgPool, date: &TradeDate) -> Result<Vec<IndustryDistRow>> {
    let rows = sqlx::query_as::<_, IndustryDistRow>(
        r#"
        SELECT industry,
               COUNT(*) AS limit_up_count,
               STRING_AGG(name, ',') AS stock_names
        FROM limit_list
        WHERE trade_date = $1 AND "limit" = 'U'
        GROUP BY industry
        ORDER BY limit_up_count DESC
        LIMIT 10
        "#,
    )
    .bind(date.as_str())
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// 最强涨停股前 10（封单金额降序）。
pub async fn strongest_stocks(pool: &PgPool, date: &TradeDate) -> Result<Vec<StrongestRow>> {
    let rows = sqlx::query_as::<_, StrongestRow>(
        r#"
        SELECT ts_code, name, industry,
               fd_amount::float8 AS fd_amount,
               limit_times::int4 AS limit_times,
               turnover_ratio::float8 AS turnover_ratio,
               up_stat
        FROM limit_list
        WHERE trade_date = $1 AND "limit" = 'U'
        ORDER BY fd_amount DESC
        LIMIT 10
        "#,
    )
    .bind(date.as_str())
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// 最快涨停股前 10（首次封板时间升序）。
pub async fn fastest_stocks(pool: &PgPool, date: &TradeDate) -> Result<Vec<FastestRow>> {
    let rows = sqlx::query_as::<_, FastestRow>(
        r#"
        SELECT ts_code, name, industry, first_time,
               fd_amount::float8 AS fd_amount,
               limit_times::int4 AS limit_times
        FROM limit_list
        WHERE trade_date = $1 AND "limit" = 'U'
        ORDER BY first_time
        LIMIT 10
        "#,
    )
    .bind(date.as_str())
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// 尾盘封板股前 10（14:30 后封板，封板时间降序）。
pub async fn last_hit_stocks(pool: &PgPool, date: &TradeDate) -> Result<Vec<LastHitRow>> {
    let rows = sqlx::query_as::<_, LastHitRow>(
        r#"
        SELECT ts_code, name, industry, last_time,
               fd_amount::float8 AS fd_amount,
               limit_times::int4 AS limit_times
        FROM limit_list
        WHERE trade_date = $1 AND "limit" = 'U'
          AND last_time >= '14:30:00'
        ORDER BY last_time DESC
        LIMIT 10
        "#,
    )
    .bind(date.as_str())
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// 炸板股前 10（打开次数降序）。
pub async fn broken_board_stocks(pool: &PgPool, date: &TradeDate) -> Result<Vec<BrokenBoardRow>> {
    let rows = sqlx::query_as::<_, BrokenBoardRow>(
        r#"
        SELECT ts_code, name, industry,
               open_times::int4 AS open_times,
               first_time,
               pct_chg::float8 AS pct_chg
        FROM limit_list
        WHERE trade_date = $1 AND "limit" = 'Z'
        ORDER BY open_times DESC
        LIMIT 10
        "#,
    )
    .bind(date.as_str())
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// 异动股前 20：成交额超过 5 日均值 3 倍，或换手率超 15%。
pub async fn abnormal_moves(pool: &PgPool, date: &TradeDate) -> Result<Vec<AbnormalMoveRow>> {
    let rows = sqlx::query_as::<_, AbnormalMoveRow>(
        r#"
        WITH prev_data AS (
            SELECT
                l1.ts_code,
                l1.name,
                l1.industry,
                l1.amount,
                l1.turnover_ratio,
                l1.pct_chg,
                AVG(l2.amount) AS avg_amount_5d,
                AVG(l2.turnover_ratio) AS avg_turnover_5d
            FROM limit_list l1
            LEFT JOIN limit_list l2 ON l1.ts_code = l2.ts_code
                AND l2.trade_date < $1
                AND l2.trade_date >= (
                    SELECT MIN(trade_date)
                    FROM (
                        SELECT DISTINCT trade_date
                        FROM limit_list
                        WHERE trade_date < $1
                        ORDER BY trade_date DESC
                        LIMIT 5
                    ) t
                )
            WHERE l1.trade_date = $1
            GROUP BY l1.ts_code, l1.name, l1.industry, l1.amount,
                     l1.turnover_ratio, l1.pct_chg
        )
        SELECT
            ts_code,
            name,
            industry,
            amount::float8 AS amount,
            turnover_ratio::float8 AS turnover_ratio,
            pct_chg::float8 AS pct_chg,
            (amount / NULLIF(avg_amount_5d, 0))::float8 AS amount_ratio,
            (turnover_ratio / NULLIF(avg_turnover_5d, 0))::float8 AS turnover_ratio_change
        FROM prev_data
        WHERE (amount / NULLIF(avg_amount_5d, 0)) > 3
           OR turnover_ratio > 15
        ORDER BY amount_ratio DESC
        LIMIT 20
        "#,
    )
    .bind(date.as_str())
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// 近 10 个交易日连板趋势。
pub async fn board_trend(pool: &PgPool, date: &TradeDate) -> Result<Vec<BoardTrendRow>> {
    let rows = sqlx::query_as::<_, BoardTrendRow>(
        r#"
        SELECT
            trade_date,
            COUNT(CASE WHEN limit_times = 1 THEN 1 END) AS first_board,
            COUNT(CASE WHEN limit_times = 2 THEN 1 END) AS second_board,
            COUNT(CASE WHEN limit_times >= 3 THEN 1 END) AS third_plus_board,
            COUNT(CASE WHEN "limit" = 'Z' THEN 1 END) AS broken_board
        FROM limit_list
        WHERE trade_date <= $1
          AND trade_date >= (
              SELECT MIN(trade_date)
              FROM (
                  SELECT DISTINCT trade_date
                  FROM limit_list
                  WHERE trade_date < $1
                  ORDER BY trade_date DESC
                  LIMIT 10
              ) t
          )
        GROUP BY trade_date
        ORDER BY trade_date
        "#,
    )
    .bind(date.as_str())
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// 5 日强势股前 20：近 5 日内至少 3 天涨幅 ≥5% 或封板/炸板。
pub async fn strong_stocks(pool: &PgPool, date: &TradeDate) -> Result<Vec<StrongStockRow>> {
    let rows = sqlx::query_as::<_, StrongStockRow>(
        r#"
        WITH consecutive_days AS (
            SELECT
                l1.ts_code,
                l1.name,
                l1.industry,
                COUNT(*) AS up_days,
                SUM(l1.pct_chg) AS total_gain,
                STRING_AGG(
                    CASE
                        WHEN l1.limit = 'U' THEN '涨停'
                        WHEN l1.limit = 'Z' THEN '炸板'
                        ELSE ROUND(l1.pct_chg::numeric, 2)::text || '%'
                    END,
                    '->' ORDER BY l1.trade_date
                ) AS trend
            FROM limit_list l1
            WHERE l1.trade_date <= $1
              AND l1.trade_date >= (
                  SELECT MIN(trade_date)
                  FROM (
                      SELECT DISTINCT trade_date
                      FROM limit_list
                      WHERE trade_date < $1
                      ORDER BY trade_date DESC
                      LIMIT 5
                  ) t
              )
              AND (l1.pct_chg >= 5 OR l1.limit IN ('U', 'Z'))
            GROUP BY l1.ts_code, l1.name, l1.industry
            HAVING COUNT(*) >= 3
        )
        SELECT ts_code, name, industry, up_days,
               total_gain::float8 AS total_gain,
               trend
        FROM consecutive_days
        ORDER BY total_gain DESC
        LIMIT 20
        "#,
    )
    .bind(date.as_str())
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// 板块联动前 15：涨停 2 家以上的行业，按涨停占比、平均涨幅降序。
pub async fn sector_linkage(pool: &PgPool, date: &TradeDate) -> Result<Vec<SectorLinkageRow>> {
    let rows = sqlx::query_as::<_, SectorLinkageRow>(
        r#"
        WITH sector_stats AS (
            SELECT
                l1.industry,
                COUNT(DISTINCT l1.ts_code) AS stock_count,
                COUNT(DISTINCT CASE WHEN l1.limit = 'U' THEN l1.ts_code END) AS limit_up_count,
                AVG(l1.pct_chg) AS avg_change,
                STRING_AGG(
                    CASE WHEN l1.limit = 'U' THEN l1.name END,
                    ',' ORDER BY l1.first_time
                ) AS limit_up_stocks
            FROM limit_list l1
            WHERE l1.trade_date = $1
            GROUP BY l1.industry
            HAVING COUNT(DISTINCT CASE WHEN l1.limit = 'U' THEN l1.ts_code END) >= 2
        )
        SELECT
            industry,
            stock_count,
            limit_up_count,
            avg_change::float8 AS avg_change,
            limit_up_stocks,
            (limit_up_count::float8 / NULLIF(stock_count, 0) * 100) AS limit_up_ratio
        FROM sector_stats
        ORDER BY limit_up_ratio DESC, avg_change DESC
        LIMIT 15
        "#,
    )
    .bind(date.as_str())
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(ts_code: &str, limit_times: i32, lu_time: &str) -> LimitUpRow {
        LimitUpRow {
            ts_code: ts_code.to_string(),
            name: None,
            trade_date: "20240105".to_string(),
            limit_times: Some(limit_times),
            lu_time: Some(lu_time.to_string()),
            open_time: None,
            last_time: None,
            lu_desc: None,
            theme: None,
            status: None,
            net_change: None,
            pct_chg: None,
            amount: None,
            turnover_rate: None,
            bid_amount: None,
            bid_turnover: None,
            free_float: None,
            lu_limit_order: None,
        }
    }

    #[test]
    fn test_ordering_count_desc_then_time_asc() {
        let mut rows = vec![
            row("A", 1, "09:31:00"),
            row("B", 3, "10:00:00"),
            row("C", 2, "09:25:00"),
        ];
        sort_limit_board(&mut rows);
        let order: Vec<&str> = rows.iter().map(|r| r.ts_code.as_str()).collect();
        assert_eq!(order, vec!["B", "C", "A"]);
    }

    #[test]
    fn test_ordering_ties_broken_by_time() {
        let mut rows = vec![
            row("A", 2, "10:00:00"),
            row("B", 2, "09:25:00"),
            row("C", 2, "09:45:00"),
        ];
        sort_limit_board(&mut rows);
        let order: Vec<&str> = rows.iter().map(|r| r.ts_code.as_str()).collect();
        assert_eq!(order, vec!["B", "C", "A"]);
    }

    #[test]
    fn test_missing_time_sorts_last_within_count() {
        let mut rows = vec![row("A", 2, "10:00:00"), row("B", 2, "09:25:00")];
        rows.push(LimitUpRow {
            lu_time: None,
            ..row("C", 2, "")
        });
        sort_limit_board(&mut rows);
        assert_eq!(rows.last().map(|r| r.ts_code.as_str()), Some("C"));
    }

    #[test]
    fn test_up_stat_validation() {
        assert!(validate_up_stat("3/5").is_ok());
        assert!(validate_up_stat("10/10").is_ok());
        assert!(validate_up_stat("3-5").is_err());
        assert!(validate_up_stat("/5").is_err());
        assert!(validate_up_stat("3/5/7").is_err());
        assert!(validate_up_stat("abc").is_err());
    }
}
