//! 技术指标标注。
//!
//! 指标值全部来自仓库预计算列，这里只做简单的派生判断：
//! 收盘价对均线的趋势方向、均线多空排列、KDJ 超买超卖。

use review_core::sanitize::{clean_nullable, clean_or_zero};
use review_data::warehouse::TechnicalFactorRow;
use serde::{Deserialize, Serialize};

/// 趋势方向。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
}

/// KDJ 信号。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KdjSignal {
    Overbought,
    Oversold,
    Neutral,
}

/// 均线交叉状态。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaCross {
    /// 多头排列：MA5 > MA10 > MA20
    pub golden_cross: bool,
    /// 空头排列：MA5 < MA10 < MA20
    pub death_cross: bool,
}

/// 趋势组。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendGroup {
    pub short_term: Trend,
    pub medium_term: Trend,
    pub long_term: Trend,
    pub ma_cross: MaCross,
}

/// MACD 组。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MacdGroup {
    pub trend: Trend,
    /// DIF 与 DEA 的离差
    pub divergence: f64,
    pub macd: f64,
    pub dif: f64,
    pub dea: f64,
}

/// KDJ 组。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KdjGroup {
    pub k: f64,
    pub d: f64,
    pub j: f64,
    pub signal: KdjSignal,
}

/// RSI 组。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RsiGroup {
    pub rsi6: f64,
    pub rsi12: f64,
    pub rsi24: f64,
}

/// 波动组。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolatilityGroup {
    pub atr: f64,
    pub bias1: f64,
    pub bias2: f64,
    pub bias3: f64,
}

/// 价格组。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceGroup {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub change_pct: f64,
}

/// 成交组。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeGroup {
    pub volume: f64,
    pub amount: f64,
    pub turnover_rate: f64,
    pub turnover_rate_free: Option<f64>,
}

/// 单个交易日的技术指标标注。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyTechnicalAnalysis {
    pub trade_date: String,
    pub trend: TrendGroup,
    pub macd: MacdGroup,
    pub kdj: KdjGroup,
    pub rsi: RsiGroup,
    pub volatility: VolatilityGroup,
    pub price: PriceGroup,
    pub volume: VolumeGroup,
}

/// 技术指标报表。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicalReport {
    pub ts_code: String,
    pub period: i64,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub data: Vec<DailyTechnicalAnalysis>,
}

fn trend_vs(close: f64, ma: f64) -> Trend {
    if close > ma {
        Trend::Up
    } else {
        Trend::Down
    }
}

/// 标注单个交易日。
pub fn annotate_day(row: &TechnicalFactorRow) -> DailyTechnicalAnalysis {
    let close = clean_or_zero(row.close);
    let ma5 = clean_or_zero(row.ma_bfq_5);
    let ma10 = clean_or_zero(row.ma_bfq_10);
    let ma20 = clean_or_zero(row.ma_bfq_20);
    let ma60 = clean_or_zero(row.ma_bfq_60);
    let macd = clean_or_zero(row.macd_bfq);
    let dif = clean_or_zero(row.macd_dif_bfq);
    let dea = clean_or_zero(row.macd_dea_bfq);
    let kdj_j = clean_or_zero(row.kdj_bfq);

    DailyTechnicalAnalysis {
        trade_date: row.trade_date.clone(),
        trend: TrendGroup {
            short_term: trend_vs(close, ma5),
            medium_term: trend_vs(close, ma20),
            long_term: trend_vs(close, ma60),
            ma_cross: MaCross {
                golden_cross: ma5 > ma10 && ma10 > ma20,
                death_cross: ma5 < ma10 && ma10 < ma20,
            },
        },
        macd: MacdGroup {
            trend: if macd > 0.0 { Trend::Up } else { Trend::Down },
            divergence: dif - dea,
            macd,
            dif,
            dea,
        },
        kdj: KdjGroup {
            k: clean_or_zero(row.kdj_k_bfq),
            d: clean_or_zero(row.kdj_d_bfq),
            j: kdj_j,
            signal: if kdj_j > 80.0 {
                KdjSignal::Overbought
            } else if kdj_j < 20.0 {
                KdjSignal::Oversold
            } else {
                KdjSignal::Neutral
            },
        },
        rsi: RsiGroup {
            rsi6: clean_or_zero(row.rsi_bfq_6),
            rsi12: clean_or_zero(row.rsi_bfq_12),
            rsi24: clean_or_zero(row.rsi_bfq_24),
        },
        volatility: VolatilityGroup {
            atr: clean_or_zero(row.atr_bfq),
            bias1: clean_or_zero(row.bias1_bfq),
            bias2: clean_or_zero(row.bias2_bfq),
            bias3: clean_or_zero(row.bias3_bfq),
        },
        price: PriceGroup {
            open: clean_or_zero(row.open),
            high: clean_or_zero(row.high),
            low: clean_or_zero(row.low),
            close,
            change_pct: clean_or_zero(row.pct_chg),
        },
        volume: VolumeGroup {
            volume: clean_or_zero(row.vol),
            amount: clean_or_zero(row.amount),
            turnover_rate: clean_or_zero(row.turnover_rate),
            turnover_rate_free: clean_nullable(row.turnover_rate_f),
        },
    }
}

/// 标注整个指标窗口（行按日期升序）。空窗口产出空报表。
pub fn annotate_window(
    ts_code: &str,
    period: i64,
    rows: &[TechnicalFactorRow],
) -> TechnicalReport {
    let data: Vec<DailyTechnicalAnalysis> = rows.iter().map(annotate_day).collect();

    TechnicalReport {
        ts_code: ts_code.to_string(),
        period,
        start_date: data.first().map(|d| d.trade_date.clone()),
        end_date: data.last().map(|d| d.trade_date.clone()),
        data,
    }
}
