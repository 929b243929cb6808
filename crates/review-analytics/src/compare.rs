//! 股票对比引擎。
//!
//! 每条序列各自以区间内第一根收盘价为基准计算相对涨跌幅，
//! 跨股票比较只在相对百分比空间有意义。空序列是正常结果。

use review_core::sanitize;
use review_data::warehouse::{DailyBarRow, LimitEventRow, StockBasicRow};
use serde::{Deserialize, Serialize};

/// 对比序列中的一个交易日。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonBar {
    pub trade_date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub amount: f64,
    pub pct_chg: f64,
    pub turnover_rate: Option<f64>,
    pub volume_ratio: Option<f64>,
    pub brar_ar: Option<f64>,
    pub brar_br: Option<f64>,
    pub psy: Option<f64>,
    pub psyma: Option<f64>,
    /// 相对区间首日收盘价的涨跌幅（%），首日恒为 0
    pub relative_chg: f64,
}

/// 单只股票的对比序列。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonSeries {
    pub ts_code: String,
    pub name: Option<String>,
    pub industry: Option<String>,
    pub market: Option<String>,
    pub daily: Vec<ComparisonBar>,
    /// 区间内涨停/炸板事件，不参与重定基
    pub limit: Vec<LimitEventRow>,
}

/// 对比结果：基准股票加若干对比股票。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub base_stock: ComparisonSeries,
    pub compare_stocks: Vec<ComparisonSeries>,
}

/// 对单条日线序列做重定基。
///
/// `relative_chg[i] = (close[i] - close[0]) / close[0] * 100`，
/// 首日按定义为 0。空输入返回空序列，不视为错误。
pub fn rebase(bars: &[DailyBarRow]) -> Vec<ComparisonBar> {
    let mut first_close: Option<f64> = None;

    bars.iter()
        .map(|bar| {
            let close = sanitize::clean_or_zero(bar.close);
            let relative_chg = match first_close {
                None => {
                    first_close = Some(close);
                    0.0
                }
                Some(base) if base != 0.0 => (close - base) / base * 100.0,
                Some(_) => 0.0,
            };

            ComparisonBar {
                trade_date: bar.trade_date.clone(),
                open: sanitize::clean_or_zero(bar.open),
                high: sanitize::clean_or_zero(bar.high),
                low: sanitize::clean_or_zero(bar.low),
                close,
                volume: sanitize::clean_or_zero(bar.vol),
                amount: sanitize::clean_or_zero(bar.amount),
                pct_chg: sanitize::clean_or_zero(bar.pct_chg),
                turnover_rate: sanitize::clean_nullable(bar.turnover_rate_f),
                volume_ratio: sanitize::clean_nullable(bar.volume_ratio),
                brar_ar: sanitize::clean_nullable(bar.brar_ar_bfq),
                brar_br: sanitize::clean_nullable(bar.brar_br_bfq),
                psy: sanitize::clean_nullable(bar.psy_bfq),
                psyma: sanitize::clean_nullable(bar.psyma_bfq),
                relative_chg,
            }
        })
        .collect()
}

/// 把基础信息、日线与涨停事件装配为一条对比序列。
pub fn build_series(
    ts_code: &str,
    basic: Option<StockBasicRow>,
    bars: &[DailyBarRow],
    limit: Vec<LimitEventRow>,
) -> ComparisonSeries {
    let (name, industry, market) = match basic {
        Some(b) => (b.name, b.industry, b.market),
        None => (None, None, None),
    };

    ComparisonSeries {
        ts_code: ts_code.to_string(),
        name,
        industry,
        market,
        daily: rebase(bars),
        limit,
    }
}
