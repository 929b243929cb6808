//! 量价异动分类器。
//!
//! 无状态规则表，逐股逐日评估。一次调用返回零到多个标签，
//! 多种异动可以同时命中，从不抛错：缺失或非法的输入只会让
//! 对应规则不触发，不会让分类失败。
//!
//! 量比 = 当日成交量 ÷ 此前 5 个交易日均量（不含当日）。

use review_core::types::VolumeAnomalyType;
use review_data::warehouse::{MoneyFlowRow, StockFactorRow, StockVolumeBasicRow};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// 异动严重程度。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// 异动标签。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyLabel {
    /// 放量上涨
    VolumeUp,
    /// 放量下跌
    VolumeDown,
    /// 缩量上涨
    VolumeDecreaseUp,
    /// 缩量下跌
    VolumeDecreaseDown,
    /// 价涨量缩背离
    PriceUpVolumeDown,
    /// 主力资金大幅流出
    MainForceOutflow,
    /// 资金流量指标极值
    MfiExtreme,
}

/// 单条异动结果：标签、描述、严重度与触发指标。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Anomaly {
    #[serde(rename = "type")]
    pub label: AnomalyLabel,
    pub description: String,
    pub severity: Severity,
    pub indicators: serde_json::Value,
}

/// 分类器输入，字段缺失表示当日无该项数据。
#[derive(Debug, Clone, Default)]
pub struct AnomalyInput {
    /// 量比（当日量 ÷ 前 5 日均量）
    pub volume_ratio: Option<f64>,
    /// 当日涨跌幅（%）
    pub pct_chg: Option<f64>,
    /// 当日成交量
    pub vol: Option<f64>,
    /// 昨日成交量
    pub pre_vol: Option<f64>,
    /// 主力净流入额
    pub net_amount: Option<f64>,
    /// 主力净流入占比（%）
    pub net_amount_rate: Option<f64>,
    /// 资金流量指标
    pub mfi: Option<f64>,
}

impl AnomalyInput {
    /// 从取数层的三类行拼装输入。
    ///
    /// 量比优先用因子表的预计算列，缺失时退回 当日量 ÷ 5 日均量。
    pub fn from_rows(
        basic: Option<&StockVolumeBasicRow>,
        flow: Option<&MoneyFlowRow>,
        factor: Option<&StockFactorRow>,
    ) -> Self {
        let computed_ratio = basic.and_then(|b| match (b.vol, b.avg_vol_5d) {
            (Some(v), Some(avg)) if avg > 0.0 => Some(v / avg),
            _ => None,
        });

        Self {
            volume_ratio: factor.and_then(|f| f.volume_ratio).or(computed_ratio),
            pct_chg: basic.and_then(|b| b.pct_chg),
            vol: basic.and_then(|b| b.vol),
            pre_vol: basic.and_then(|b| b.pre_vol),
            net_amount: flow.and_then(|f| f.net_amount),
            net_amount_rate: flow.and_then(|f| f.net_amount_rate),
            mfi: factor.and_then(|f| f.mfi_qfq),
        }
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// 评估全部规则，返回命中的异动列表（可能为空）。
pub fn classify(input: &AnomalyInput) -> Vec<Anomaly> {
    let mut anomalies = Vec::new();

    // 量比四象限：边界值 1.5 / 0.5 都落在闭区间一侧
    if let (Some(ratio), Some(chg)) = (finite(input.volume_ratio), finite(input.pct_chg)) {
        let quadrant = if ratio >= 1.5 && chg > 0.0 {
            Some(VolumeAnomalyType::VolumeUp)
        } else if ratio >= 1.5 && chg < 0.0 {
            Some(VolumeAnomalyType::VolumeDown)
        } else if ratio <= 0.5 && chg > 0.0 {
            Some(VolumeAnomalyType::VolumeDecreaseUp)
        } else if ratio <= 0.5 && chg < 0.0 {
            Some(VolumeAnomalyType::VolumeDecreaseDown)
        } else {
            None
        };

        if let Some(kind) = quadrant {
            let (label, description) = match kind {
                VolumeAnomalyType::VolumeUp => (AnomalyLabel::VolumeUp, "放量上涨"),
                VolumeAnomalyType::VolumeDown => (AnomalyLabel::VolumeDown, "放量下跌"),
                VolumeAnomalyType::VolumeDecreaseUp => {
                    (AnomalyLabel::VolumeDecreaseUp, "缩量上涨")
                }
                VolumeAnomalyType::VolumeDecreaseDown => {
                    (AnomalyLabel::VolumeDecreaseDown, "缩量下跌")
                }
            };
            anomalies.push(Anomaly {
                label,
                description: description.to_string(),
                severity: Severity::Low,
                indicators: json!({
                    "volume_ratio": ratio,
                    "pct_chg": chg,
                }),
            });
        }
    }

    // 量价背离：涨超 2% 但成交量不足昨日八成
    if let (Some(chg), Some(vol), Some(pre_vol)) = (
        finite(input.pct_chg),
        finite(input.vol),
        finite(input.pre_vol),
    ) {
        if chg > 2.0 && pre_vol > 0.0 && vol < pre_vol * 0.8 {
            anomalies.push(Anomaly {
                label: AnomalyLabel::PriceUpVolumeDown,
                description: "价格上涨但成交量萎缩".to_string(),
                severity: Severity::Medium,
                indicators: json!({
                    "price_change": chg,
                    "volume_ratio": vol / pre_vol,
                }),
            });
        }
    }

    // 主力流出：净流出超 1000 且占比绝对值超 30%
    if let (Some(net), Some(rate)) = (finite(input.net_amount), finite(input.net_amount_rate)) {
        if net < -1000.0 && rate.abs() > 30.0 {
            anomalies.push(Anomaly {
                label: AnomalyLabel::MainForceOutflow,
                description: "主力资金大幅流出".to_string(),
                severity: Severity::High,
                indicators: json!({
                    "net_amount": net,
                    "net_amount_rate": rate,
                }),
            });
        }
    }

    // MFI 极值
    if let Some(mfi) = finite(input.mfi) {
        if !(20.0..=80.0).contains(&mfi) {
            anomalies.push(Anomaly {
                label: AnomalyLabel::MfiExtreme,
                description: "资金流量指标处于极值".to_string(),
                severity: Severity::Medium,
                indicators: json!({ "mfi": mfi }),
            });
        }
    }

    anomalies
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(volume_ratio: f64, pct_chg: f64) -> AnomalyInput {
        AnomalyInput {
            volume_ratio: Some(volume_ratio),
            pct_chg: Some(pct_chg),
            ..Default::default()
        }
    }

    #[test]
    fn test_boundary_ratio_included_in_ge_branch() {
        // 量比恰好 1.5 应命中放量分支
        let result = classify(&input(1.5, 3.0));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].label, AnomalyLabel::VolumeUp);

        let result = classify(&input(1.5, -3.0));
        assert_eq!(result[0].label, AnomalyLabel::VolumeDown);
    }

    #[test]
    fn test_boundary_half_included_in_le_branch() {
        let result = classify(&input(0.5, 1.0));
        assert_eq!(result[0].label, AnomalyLabel::VolumeDecreaseUp);
    }

    #[test]
    fn test_neutral_zone_no_label() {
        assert!(classify(&input(1.0, 3.0)).is_empty());
        // 涨跌幅为零不属于任何象限
        assert!(classify(&input(2.0, 0.0)).is_empty());
    }

    #[test]
    fn test_multiple_labels_co_occur() {
        let input = AnomalyInput {
            volume_ratio: Some(0.4),
            pct_chg: Some(3.0),
            vol: Some(700.0),
            pre_vol: Some(1000.0),
            net_amount: Some(-2000.0),
            net_amount_rate: Some(-45.0),
            mfi: Some(15.0),
        };
        let labels: Vec<_> = classify(&input).into_iter().map(|a| a.label).collect();
        assert_eq!(
            labels,
            vec![
                AnomalyLabel::VolumeDecreaseUp,
                AnomalyLabel::PriceUpVolumeDown,
                AnomalyLabel::MainForceOutflow,
                AnomalyLabel::MfiExtreme,
            ]
        );
    }

    #[test]
    fn test_mfi_extremes_both_sides() {
        let overbought = AnomalyInput {
            mfi: Some(85.0),
            ..Default::default()
        };
        assert_eq!(classify(&overbought).len(), 1);

        let oversold = AnomalyInput {
            mfi: Some(19.9),
            ..Default::default()
        };
        assert_eq!(classify(&oversold).len(), 1);

        let neutral = AnomalyInput {
            mfi: Some(50.0),
            ..Default::default()
        };
        assert!(classify(&neutral).is_empty());
    }

    #[test]
    fn test_never_panics_on_degenerate_input() {
        // 缺失、NaN、Inf 都只是让规则不触发
        assert!(classify(&AnomalyInput::default()).is_empty());
        let weird = AnomalyInput {
            volume_ratio: Some(f64::NAN),
            pct_chg: Some(f64::INFINITY),
            vol: Some(f64::NEG_INFINITY),
            pre_vol: Some(0.0),
            net_amount: Some(f64::NAN),
            net_amount_rate: Some(f64::NAN),
            mfi: Some(f64::NAN),
        };
        assert!(classify(&weird).is_empty());
    }

    #[test]
    fn test_from_rows_falls_back_to_computed_ratio() {
        let basic = StockVolumeBasicRow {
            ts_code: "000001.SZ".to_string(),
            trade_date: "20240105".to_string(),
            close: Some(10.0),
            vol: Some(3000.0),
            amount: Some(1.0),
            pct_chg: Some(2.5),
            pre_vol: Some(1500.0),
            avg_vol_5d: Some(1500.0),
        };
        let input = AnomalyInput::from_rows(Some(&basic), None, None);
        assert_eq!(input.volume_ratio, Some(2.0));

        let labels: Vec<_> = classify(&input).into_iter().map(|a| a.label).collect();
        assert_eq!(labels, vec![AnomalyLabel::VolumeUp]);
    }
}
