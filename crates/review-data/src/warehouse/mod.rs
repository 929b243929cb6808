//! 仓库查询目录。
//!
//! 每个查询是 (交易日/区间, 证券代码, 过滤参数) 的纯函数，
//! 只读不写，排序是各查询的固定契约。
//! 空结果集是正常返回，不是错误。

pub mod concepts;
pub mod daily;
pub mod limit_board;
pub mod overview;
pub mod sector_flow;
pub mod technical;
pub mod top_list;
pub mod volume;

pub use concepts::{concepts, ConceptRow};
pub use daily::{daily_bars, limit_events, stock_basic, DailyBarRow, LimitEventRow, StockBasicRow};
pub use limit_board::{
    abnormal_moves, board_trend, broken_board_stocks, fastest_stocks, industry_distribution,
    last_hit_stocks, limit_stats, limit_up_board, sector_linkage, sort_limit_board,
    strong_stocks, strongest_stocks, validate_up_stat, AbnormalMoveRow, BoardTrendRow,
    BrokenBoardRow, FastestRow, IndustryDistRow, LastHitRow, LimitStatsRow, LimitUpRow,
    SectorLinkageRow, StrongStockRow, StrongestRow,
};
pub use overview::{benchmark_overview, market_statistics, IndexOverviewRow, MarketStatsRow};
pub use sector_flow::{sector_flow, SectorFlowRow};
pub use technical::{
    latest_factor_date, technical_for_top_list, technical_window, TechnicalFactorRow, TechnicalRow,
};
pub use top_list::{top_list, TopListRow};
pub use volume::{
    anomaly_stocks, bucket_volume_ratios, factor_snapshot, market_volume_totals, money_flow,
    stock_kline_window, volume_basic_data, volume_distribution, MarketVolumeTotalsRow,
    MoneyFlowRow, StockFactorRow, StockKlineRow, StockVolumeBasicRow, VolumeAnomalyRow,
    VolumeDistributionRow,
};
