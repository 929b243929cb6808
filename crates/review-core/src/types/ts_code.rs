//! 证券代码类型。
//!
//! `ts_code` 形如 `000001.SZ` / `600000.SH`，整体按不透明字符串处理，
//! 仅通过数字前缀做板块归类。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 三大基准指数代码（上证指数、深证成指、创业板指）。
pub const BENCHMARK_INDICES: [&str; 3] = ["000001.SH", "399001.SZ", "399006.SZ"];

/// 板块分类。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketBoard {
    /// 沪市主板（60 开头）
    ShanghaiMain,
    /// 深市主板（00 开头）
    ShenzhenMain,
    /// 创业板（30 开头）
    ChiNext,
    /// 其他（科创板、北交所、指数等）
    Other,
}

/// 证券代码。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TsCode(String);

impl TsCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 按前缀归类板块。
    pub fn board(&self) -> MarketBoard {
        match self.0.get(..2) {
            Some("60") => MarketBoard::ShanghaiMain,
            Some("00") => MarketBoard::ShenzhenMain,
            Some("30") => MarketBoard::ChiNext,
            _ => MarketBoard::Other,
        }
    }

    /// 是否为基准指数。
    pub fn is_benchmark_index(&self) -> bool {
        BENCHMARK_INDICES.contains(&self.0.as_str())
    }
}

impl fmt::Display for TsCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TsCode {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TsCode {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_classification() {
        assert_eq!(TsCode::from("600519.SH").board(), MarketBoard::ShanghaiMain);
        assert_eq!(TsCode::from("000002.SZ").board(), MarketBoard::ShenzhenMain);
        assert_eq!(TsCode::from("300750.SZ").board(), MarketBoard::ChiNext);
        assert_eq!(TsCode::from("688981.SH").board(), MarketBoard::Other);
    }

    #[test]
    fn test_benchmark_indices() {
        assert!(TsCode::from("000001.SH").is_benchmark_index());
        assert!(TsCode::from("399006.SZ").is_benchmark_index());
        assert!(!TsCode::from("600519.SH").is_benchmark_index());
    }
}
