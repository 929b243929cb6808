//! 报表取数接口。
//!
//! [`MarketDataSource`] 把复盘报表用到的各分项查询抽象成一个 trait，
//! 报表组装层只依赖这个接口，测试用内存 mock 实现即可，
//! 不需要真实数据库。

use crate::error::Result;
use crate::warehouse::{self, *};
use async_trait::async_trait;
use review_core::types::TradeDate;
use sqlx::PgPool;

/// 复盘报表的数据来源。
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    // ==================== 每日复盘分项 ====================

    /// 基准指数行情
    async fn benchmark_overview(&self, date: &TradeDate) -> Result<Vec<IndexOverviewRow>>;
    /// 板块资金流向
    async fn sector_flow(&self, date: &TradeDate) -> Result<Vec<SectorFlowRow>>;
    /// 龙虎榜
    async fn top_list(&self, date: &TradeDate) -> Result<Vec<TopListRow>>;
    /// 热门概念
    async fn concepts(&self, date: &TradeDate) -> Result<Vec<ConceptRow>>;
    /// 涨停板列表
    async fn limit_up_board(
        &self,
        date: &TradeDate,
        min_limit_times: Option<i32>,
        up_stat: Option<&str>,
    ) -> Result<Vec<LimitUpRow>>;
    /// 龙虎榜个股技术指标
    async fn technical_for_top_list(&self, date: &TradeDate) -> Result<Vec<TechnicalRow>>;

    // ==================== 涨停分析分项 ====================

    async fn limit_stats(&self, date: &TradeDate) -> Result<Vec<LimitStatsRow>>;
    async fn industry_distribution(&self, date: &TradeDate) -> Result<Vec<IndustryDistRow>>;
    async fn strongest_stocks(&self, date: &TradeDate) -> Result<Vec<StrongestRow>>;
    async fn fastest_stocks(&self, date: &TradeDate) -> Result<Vec<FastestRow>>;
    async fn last_hit_stocks(&self, date: &TradeDate) -> Result<Vec<LastHitRow>>;
    async fn broken_board_stocks(&self, date: &TradeDate) -> Result<Vec<BrokenBoardRow>>;
    async fn abnormal_moves(&self, date: &TradeDate) -> Result<Vec<AbnormalMoveRow>>;
    async fn board_trend(&self, date: &TradeDate) -> Result<Vec<BoardTrendRow>>;
    async fn strong_stocks(&self, date: &TradeDate) -> Result<Vec<StrongStockRow>>;
    async fn sector_linkage(&self, date: &TradeDate) -> Result<Vec<SectorLinkageRow>>;
}

/// 直连 PostgreSQL 仓库的数据源。
#[derive(Clone)]
pub struct WarehouseSource {
    pool: PgPool,
}

impl WarehouseSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl MarketDataSource for WarehouseSource {
    async fn benchmark_overview(&self, date: &TradeDate) -> Result<Vec<IndexOverviewRow>> {
        warehouse::benchmark_overview(&self.pool, date).await
    }

    async fn sector_flow(&self, date: &TradeDate) -> Result<Vec<SectorFlowRow>> {
        warehouse::sector_flow(&self.pool, date).await
    }

    async fn top_list(&self, date: &TradeDate) -> Result<Vec<TopListRow>> {
        warehouse::top_list(&self.pool, date).await
    }

    async fn concepts(&self, date: &TradeDate) -> Result<Vec<ConceptRow>> {
        warehouse::concepts(&self.pool, date).await
    }

    async fn limit_up_board(
        &self,
        date: &TradeDate,
        min_limit_times: Option<i32>,
        up_stat: Option<&str>,
    ) -> Result<Vec<LimitUpRow>> {
        warehouse::limit_up_board(&self.pool, date, min_limit_times, up_stat).await
    }

    async fn technical_for_top_list(&self, date: &TradeDate) -> Result<Vec<TechnicalRow>> {
        warehouse::technical_for_top_list(&self.pool, date).await
    }

    async fn limit_stats(&self, date: &TradeDate) -> Result<Vec<LimitStatsRow>> {
        warehouse::limit_stats(&self.pool, date).await
    }

    async fn industry_distribution(&self, date: &TradeDate) -> Result<Vec<IndustryDistRow>> {
        warehouse::industry_distribution(&self.pool, date).await
    }

    async fn strongest_stocks(&self, date: &TradeDate) -> Result<Vec<StrongestRow>> {
        warehouse::strongest_stocks(&self.pool, date).await
    }

    async fn fastest_stocks(&self, date: &TradeDate) -> Result<Vec<FastestRow>> {
        warehouse::fastest_stocks(&self.pool, date).await
    }

    async fn last_hit_stocks(&self, date: &TradeDate) -> Result<Vec<LastHitRow>> {
        warehouse::last_hit_stocks(&self.pool, date).await
    }

    async fn broken_board_stocks(&self, date: &TradeDate) -> Result<Vec<BrokenBoardRow>> {
        warehouse::broken_board_stocks(&self.pool, date).await
    }

    async fn abnormal_moves(&self, date: &TradeDate) -> Result<Vec<AbnormalMoveRow>> {
        warehouse::abnormal_moves(&self.pool, date).await
    }

    async fn board_trend(&self, date: &TradeDate) -> Result<Vec<BoardTrendRow>> {
        warehouse::board_trend(&self.pool, date).await
    }

    async fn strong_stocks(&self, date: &TradeDate) -> Result<Vec<StrongStockRow>> {
        warehouse::strong_stocks(&self.pool, date).await
    }

    async fn sector_linkage(&self, date: &TradeDate) -> Result<Vec<SectorLinkageRow>> {
        warehouse::sector_linkage(&self.pool, date).await
    }
}
