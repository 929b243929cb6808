//! 量价异动查询类型。
//!
//! 四种异动类型各自对应一段固定的 SQL 过滤条件。
//! 条件文本是枚举常量，调用方输入只能命中枚举值，
//! 绝不把调用方字符串拼入 SQL。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ReviewError;

/// 量价异动类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeAnomalyType {
    /// 放量上涨：量比 ≥ 1.5 且涨幅为正
    VolumeUp,
    /// 放量下跌：量比 ≥ 1.5 且涨幅为负
    VolumeDown,
    /// 缩量上涨：量比 ≤ 0.5 且涨幅为正
    VolumeDecreaseUp,
    /// 缩量下跌：量比 ≤ 0.5 且涨幅为负
    VolumeDecreaseDown,
}

impl VolumeAnomalyType {
    /// 全部合法取值。
    pub const ALL: [VolumeAnomalyType; 4] = [
        VolumeAnomalyType::VolumeUp,
        VolumeAnomalyType::VolumeDown,
        VolumeAnomalyType::VolumeDecreaseUp,
        VolumeAnomalyType::VolumeDecreaseDown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VolumeAnomalyType::VolumeUp => "volume_up",
            VolumeAnomalyType::VolumeDown => "volume_down",
            VolumeAnomalyType::VolumeDecreaseUp => "volume_decrease_up",
            VolumeAnomalyType::VolumeDecreaseDown => "volume_decrease_down",
        }
    }

    /// 该类型对应的 SQL 过滤条件（固定查表，无任何插值）。
    pub fn sql_condition(&self) -> &'static str {
        match self {
            VolumeAnomalyType::VolumeUp => "volume_ratio >= 1.5 AND pct_chg > 0",
            VolumeAnomalyType::VolumeDown => "volume_ratio >= 1.5 AND pct_chg < 0",
            VolumeAnomalyType::VolumeDecreaseUp => "volume_ratio <= 0.5 AND pct_chg > 0",
            VolumeAnomalyType::VolumeDecreaseDown => "volume_ratio <= 0.5 AND pct_chg < 0",
        }
    }
}

impl fmt::Display for VolumeAnomalyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VolumeAnomalyType {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "volume_up" => Ok(VolumeAnomalyType::VolumeUp),
            "volume_down" => Ok(VolumeAnomalyType::VolumeDown),
            "volume_decrease_up" => Ok(VolumeAnomalyType::VolumeDecreaseUp),
            "volume_decrease_down" => Ok(VolumeAnomalyType::VolumeDecreaseDown),
            other => Err(ReviewError::InvalidFilter(format!(
                "异动类型 {} 非法，可选值: volume_up, volume_down, volume_decrease_up, volume_decrease_down",
                other
            ))),
        }
    }
}
