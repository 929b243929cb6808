//! 龙虎榜查询。
//!
//! 龙虎榜主表左联机构席位明细，按净买入额降序。

use crate::error::Result;
use review_core::types::TradeDate;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// 龙虎榜条目（含席位明细）。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TopListRow {
    pub ts_code: String,
    pub name: Option<String>,
    pub close: Option<f64>,
    pub pct_change: Option<f64>,
    pub turnover_rate: Option<f64>,
    pub l_buy: Option<f64>,
    pub l_sell: Option<f64>,
    pub net_amount: Option<f64>,
    /// 上榜原因
    pub reason: Option<String>,
    /// 席位名称
    pub exalter: Option<String>,
    pub buy: Option<f64>,
    pub sell: Option<f64>,
    pub net_buy: Option<f64>,
}

/// 查询某日龙虎榜，按净买入额降序。
pub async fn top_list(pool: &PgPool, date: &TradeDate) -> Result<Vec<TopListRow>> {
    let rows = sqlx::query_as::<_, TopListRow>(
        r#"
        SELECT
            t.ts_code,
            t.name,
            t.close::float8 AS close,
            t.pct_change::float8 AS pct_change,
            t.turnover_rate::float8 AS turnover_rate,
            t.l_buy::float8 AS l_buy,
            t.l_sell::float8 AS l_sell,
            t.net_amount::float8 AS net_amount,
            t.reason,
            i.exalter,
            i.buy::float8 AS buy,
            i.sell::float8 AS sell,
            i.net_buy::float8 AS net_buy
        FROM top_list t
        LEFT JOIN top_inst i ON t.ts_code = i.ts_code
            AND t.trade_date = i.trade_date
        WHERE t.trade_date = $1
        ORDER BY t.net_amount DESC
        "#,
    )
    .bind(date.as_str())
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
