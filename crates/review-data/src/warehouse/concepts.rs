//! 概念题材查询。

use crate::error::Result;
use review_core::types::TradeDate;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// 热门概念，按涨停家数、上涨家数降序。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ConceptRow {
    pub ts_code: String,
    pub name: Option<String>,
    /// 概念内涨停家数
    pub z_t_num: Option<i64>,
    /// 概念内上涨家数
    pub up_num: Option<i64>,
    pub stock_count: Option<i64>,
    /// 成分股名单（逗号拼接）
    pub cons_list: Option<String>,
    pub hot_num: Option<i64>,
    pub description: Option<String>,
}

/// 查询某日热门概念前 10。
pub async fn concepts(pool: &PgPool, date: &TradeDate) -> Result<Vec<ConceptRow>> {
    let rows = sqlx::query_as::<_, ConceptRow>(
        r#"
        WITH hot_concepts AS (
            SELECT
                k.ts_code,
                k.name,
                k.z_t_num::bigint AS z_t_num,
                k.up_num::bigint AS up_num,
                COUNT(c.cons_code) AS stock_count,
                STRING_AGG(c.cons_name, ',') AS cons_list,
                MAX(c.hot_num)::bigint AS hot_num,
                MAX(c.description) AS description
            FROM kpl_concept k
            LEFT JOIN kpl_concept_cons c
                ON k.ts_code = c.ts_code
                AND c.trade_date = $1
            WHERE k.trade_date = $1
            GROUP BY k.ts_code, k.name, k.z_t_num, k.up_num
            ORDER BY k.z_t_num DESC, k.up_num DESC
        )
        SELECT * FROM hot_concepts LIMIT 10
        "#,
    )
    .bind(date.as_str())
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
