//! 板块资金流向查询。

use crate::error::Result;
use review_core::types::TradeDate;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// 单个板块的资金流向，按超大/大/中/小单拆分。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SectorFlowRow {
    pub name: String,
    pub pct_change: Option<f64>,
    pub net_amount: Option<f64>,
    pub net_amount_rate: Option<f64>,
    pub buy_elg_amount: Option<f64>,
    pub buy_lg_amount: Option<f64>,
    pub buy_md_amount: Option<f64>,
    pub buy_sm_amount: Option<f64>,
    /// 板块内领涨个股
    pub hot_stock: Option<String>,
}

/// 净流入前 10 的板块，固定按净额降序。
pub async fn sector_flow(pool: &PgPool, date: &TradeDate) -> Result<Vec<SectorFlowRow>> {
    let rows = sqlx::query_as::<_, SectorFlowRow>(
        r#"
        SELECT
            name,
            pct_change::float8 AS pct_change,
            net_amount::float8 AS net_amount,
            net_amount_rate::float8 AS net_amount_rate,
            buy_elg_amount::float8 AS buy_elg_amount,
            buy_lg_amount::float8 AS buy_lg_amount,
            buy_md_amount::float8 AS buy_md_amount,
            buy_sm_amount::float8 AS buy_sm_amount,
            buy_sm_amount_stock AS hot_stock
        FROM moneyflow_ind_dc
        WHERE trade_date = $1
        ORDER BY net_amount DESC
        LIMIT 10
        "#,
    )
    .bind(date.as_str())
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
