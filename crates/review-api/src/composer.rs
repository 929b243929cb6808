//! 复盘报表组装。
//!
//! 把取数层的各分项查询并发拉齐后装配成完整报表。
//! 失败策略是整单失败：任何一个分项查询报错，整份报表报错，
//! 不返回缺分项的部分结果。分项为空列表是正常数据，照常装配。

use review_core::{ReviewResult, TradeDate};
use review_data::warehouse::{
    AbnormalMoveRow, BoardTrendRow, BrokenBoardRow, ConceptRow, FastestRow, IndexOverviewRow,
    IndustryDistRow, LastHitRow, LimitStatsRow, LimitUpRow, SectorFlowRow, SectorLinkageRow,
    StrongStockRow, StrongestRow, TechnicalRow, TopListRow,
};
use review_data::MarketDataSource;
use serde::{Deserialize, Serialize};

/// 每日复盘报表（六个分项）。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyReview {
    pub date: String,
    #[serde(rename = "overview")]
    pub market_overview: Vec<IndexOverviewRow>,
    pub sector_flow: Vec<SectorFlowRow>,
    pub top_list: Vec<TopListRow>,
    pub concepts: Vec<ConceptRow>,
    pub limit_up: Vec<LimitUpRow>,
    pub technical: Vec<TechnicalRow>,
}

/// 涨停分析报表（十个分项）。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitAnalysis {
    pub date: String,
    pub stats_by_consecutive_count: Vec<LimitStatsRow>,
    pub industry_distribution: Vec<IndustryDistRow>,
    pub strongest: Vec<StrongestRow>,
    pub fastest: Vec<FastestRow>,
    pub last_to_hit: Vec<LastHitRow>,
    pub broken_board: Vec<BrokenBoardRow>,
    pub abnormal_moves: Vec<AbnormalMoveRow>,
    pub board_trend: Vec<BoardTrendRow>,
    pub strong_stocks: Vec<StrongStockRow>,
    pub sector_linkage: Vec<SectorLinkageRow>,
}

/// 报表组装器，泛型于数据来源以便用内存 mock 测试。
pub struct ReportComposer<S: MarketDataSource> {
    source: S,
}

impl<S: MarketDataSource> ReportComposer<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// 组装每日复盘报表。
    pub async fn compose_daily_review(&self, date: &TradeDate) -> ReviewResult<DailyReview> {
        let (market_overview, sector_flow, top_list, concepts, limit_up, technical) =
            tokio::try_join!(
                self.source.benchmark_overview(date),
                self.source.sector_flow(date),
                self.source.top_list(date),
                self.source.concepts(date),
                self.source.limit_up_board(date, None, None),
                self.source.technical_for_top_list(date),
            )?;

        Ok(DailyReview {
            date: date.as_str().to_string(),
            market_overview,
            sector_flow,
            top_list,
            concepts,
            limit_up,
            technical,
        })
    }

    /// 组装涨停分析报表。
    pub async fn compose_limit_analysis(&self, date: &TradeDate) -> ReviewResult<LimitAnalysis> {
        let (
            stats_by_consecutive_count,
            industry_distribution,
            strongest,
            fastest,
            last_to_hit,
            broken_board,
            abnormal_moves,
            board_trend,
            strong_stocks,
            sector_linkage,
        ) = tokio::try_join!(
            self.source.limit_stats(date),
            self.source.industry_distribution(date),
            self.source.strongest_stocks(date),
            self.source.fastest_stocks(date),
            self.source.last_hit_stocks(date),
            self.source.broken_board_stocks(date),
            self.source.abnormal_moves(date),
            self.source.board_trend(date),
            self.source.strong_stocks(date),
            self.source.sector_linkage(date),
        )?;

        Ok(LimitAnalysis {
            date: date.as_str().to_string(),
            stats_by_consecutive_count,
            industry_distribution,
            strongest,
            fastest,
            last_to_hit,
            broken_board,
            abnormal_moves,
            board_trend,
            strong_stocks,
            sector_linkage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use review_core::ReviewError;
    use review_data::error::{DataError, Result};
    use review_data::warehouse::*;
    use serde_json::json;

    /// 内存 mock 数据源：各分项返回预置行，可按分项注入失败。
    #[derive(Default)]
    struct MockSource {
        overview: Vec<IndexOverviewRow>,
        sector_flow: Vec<SectorFlowRow>,
        top_list: Vec<TopListRow>,
        concepts: Vec<ConceptRow>,
        limit_up: Vec<LimitUpRow>,
        technical: Vec<TechnicalRow>,
        fail_top_list: bool,
        fail_strong_stocks: bool,
    }

    #[async_trait]
    impl MarketDataSource for MockSource {
        async fn benchmark_overview(&self, _: &TradeDate) -> Result<Vec<IndexOverviewRow>> {
            Ok(self.overview.clone())
        }
        async fn sector_flow(&self, _: &TradeDate) -> Result<Vec<SectorFlowRow>> {
            Ok(self.sector_flow.clone())
        }
        async fn top_list(&self, _: &TradeDate) -> Result<Vec<TopListRow>> {
            if self.fail_top_list {
                return Err(DataError::QueryError("top_list unavailable".to_string()));
            }
            Ok(self.top_list.clone())
        }
        async fn concepts(&self, _: &TradeDate) -> Result<Vec<ConceptRow>> {
            Ok(self.concepts.clone())
        }
        async fn limit_up_board(
            &self,
            _: &TradeDate,
            _: Option<i32>,
            _: Option<&str>,
        ) -> Result<Vec<LimitUpRow>> {
            Ok(self.limit_up.clone())
        }
        async fn technical_for_top_list(&self, _: &TradeDate) -> Result<Vec<TechnicalRow>> {
            Ok(self.technical.clone())
        }
        async fn limit_stats(&self, _: &TradeDate) -> Result<Vec<LimitStatsRow>> {
            Ok(vec![])
        }
        async fn industry_distribution(&self, _: &TradeDate) -> Result<Vec<IndustryDistRow>> {
            Ok(vec![])
        }
        async fn strongest_stocks(&self, _: &TradeDate) -> Result<Vec<StrongestRow>> {
            Ok(vec![])
        }
        async fn fastest_stocks(&self, _: &TradeDate) -> Result<Vec<FastestRow>> {
            Ok(vec![])
        }
        async fn last_hit_stocks(&self, _: &TradeDate) -> Result<Vec<LastHitRow>> {
            Ok(vec![])
        }
        async fn broken_board_stocks(&self, _: &TradeDate) -> Result<Vec<BrokenBoardRow>> {
            Ok(vec![])
        }
        async fn abnormal_moves(&self, _: &TradeDate) -> Result<Vec<AbnormalMoveRow>> {
            Ok(vec![])
        }
        async fn board_trend(&self, _: &TradeDate) -> Result<Vec<BoardTrendRow>> {
            Ok(vec![])
        }
        async fn strong_stocks(&self, _: &TradeDate) -> Result<Vec<StrongStockRow>> {
            if self.fail_strong_stocks {
                return Err(DataError::Timeout("strong_stocks".to_string()));
            }
            Ok(vec![])
        }
        async fn sector_linkage(&self, _: &TradeDate) -> Result<Vec<SectorLinkageRow>> {
            Ok(vec![])
        }
    }

    fn date() -> TradeDate {
        TradeDate::normalize("20240105").unwrap()
    }

    // 行结构字段很多，Option 字段缺省反序列化为 None
    fn rows<T: serde::de::DeserializeOwned>(values: Vec<serde_json::Value>) -> Vec<T> {
        values
            .into_iter()
            .map(|v| serde_json::from_value(v).unwrap())
            .collect()
    }

    fn full_mock() -> MockSource {
        MockSource {
            overview: rows(vec![
                json!({
                    "ts_code": "000001.SH",
                    "close": 2900.0,
                    "pct_chg": 0.5,
                    "total_mv": 523_000.0,
                    "pe_ttm": 13.2,
                    "pb": 1.25,
                }),
                json!({"ts_code": "399001.SZ", "close": 9000.0, "pct_chg": -0.2}),
                json!({"ts_code": "399006.SZ", "close": 1700.0, "pct_chg": 1.1}),
            ]),
            sector_flow: rows(
                (0..10)
                    .map(|i| json!({"name": format!("板块{}", i), "net_amount": 10.0 - i as f64}))
                    .collect(),
            ),
            top_list: rows(
                (0..5)
                    .map(|i| json!({"ts_code": format!("00000{}.SZ", i), "net_amount": 5.0}))
                    .collect(),
            ),
            concepts: rows(vec![
                json!({"ts_code": "885001", "name": "概念A", "z_t_num": 6}),
                json!({"ts_code": "885002", "name": "概念B", "z_t_num": 4}),
            ]),
            limit_up: rows(
                (0..4)
                    .map(|i| {
                        json!({
                            "ts_code": format!("30000{}.SZ", i),
                            "trade_date": "20240105",
                            "limit_times": 4 - i,
                        })
                    })
                    .collect(),
            ),
            technical: rows(
                (0..4)
                    .map(|i| json!({"ts_code": format!("00000{}.SZ", i), "close": 10.0}))
                    .collect(),
            ),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_daily_review_assembles_all_six_sections() {
        let composer = ReportComposer::new(full_mock());
        let review = composer.compose_daily_review(&date()).await.unwrap();

        assert_eq!(review.date, "20240105");
        assert_eq!(review.market_overview.len(), 3);
        assert_eq!(review.sector_flow.len(), 10);
        assert_eq!(review.top_list.len(), 5);
        assert_eq!(review.concepts.len(), 2);
        assert_eq!(review.limit_up.len(), 4);
        assert_eq!(review.technical.len(), 4);

        // 序列化后六个分项键都在
        let json = serde_json::to_value(&review).unwrap();
        for key in [
            "overview",
            "sectorFlow",
            "topList",
            "concepts",
            "limitUp",
            "technical",
        ] {
            assert!(json.get(key).is_some(), "missing section {}", key);
        }

        // 概览分项带指数估值列
        assert_eq!(json["overview"][0]["total_mv"], 523_000.0);
        assert_eq!(json["overview"][0]["pe_ttm"], 13.2);
        assert_eq!(json["overview"][0]["pb"], 1.25);
    }

    #[tokio::test]
    async fn test_empty_sections_compose_fine() {
        let composer = ReportComposer::new(MockSource::default());
        let review = composer.compose_daily_review(&date()).await.unwrap();
        assert!(review.market_overview.is_empty());
        assert!(review.limit_up.is_empty());
    }

    #[tokio::test]
    async fn test_one_failing_section_fails_whole_report() {
        let composer = ReportComposer::new(MockSource {
            fail_top_list: true,
            ..full_mock()
        });
        let err = composer.compose_daily_review(&date()).await.unwrap_err();
        assert!(matches!(err, ReviewError::DataSource(_)));
    }

    #[tokio::test]
    async fn test_limit_analysis_has_ten_sections() {
        let composer = ReportComposer::new(MockSource::default());
        let analysis = composer.compose_limit_analysis(&date()).await.unwrap();

        let json = serde_json::to_value(&analysis).unwrap();
        for key in [
            "statsByConsecutiveCount",
            "industryDistribution",
            "strongest",
            "fastest",
            "lastToHit",
            "brokenBoard",
            "abnormalMoves",
            "boardTrend",
            "strongStocks",
            "sectorLinkage",
        ] {
            assert!(json.get(key).is_some(), "missing section {}", key);
        }
    }

    #[tokio::test]
    async fn test_limit_analysis_all_or_nothing() {
        let composer = ReportComposer::new(MockSource {
            fail_strong_stocks: true,
            ..Default::default()
        });
        let err = composer.compose_limit_analysis(&date()).await.unwrap_err();
        assert!(matches!(err, ReviewError::DataSource(_)));
    }
}
