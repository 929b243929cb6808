//! 交易日期类型。
//!
//! 边界接受 `YYYY-MM-DD` 或 `YYYYMMDD` 两种写法，
//! 内部统一为 `YYYYMMDD` 规范形式后才允许作为查询参数使用。

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ReviewError, ReviewResult};

/// 规范形式（YYYYMMDD）的交易日期。
///
/// 每次请求从原始字符串构造，从不持久化。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradeDate(String);

impl TradeDate {
    /// 把原始日期字符串归一化为规范形式。
    ///
    /// - `"2024-01-05"` → `"20240105"`
    /// - `"20240105"` → `"20240105"`（透传）
    /// - 其他形式返回 `InvalidDateFormat`
    pub fn normalize(raw: &str) -> ReviewResult<Self> {
        let trimmed = raw.trim();
        let compact = if trimmed.len() == 10 && trimmed.as_bytes()[4] == b'-' {
            trimmed.replace('-', "")
        } else {
            trimmed.to_string()
        };

        if compact.len() != 8 || !compact.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ReviewError::InvalidDateFormat(raw.to_string()));
        }

        // 日历合法性校验（2月30日等直接拒绝）
        NaiveDate::parse_from_str(&compact, "%Y%m%d")
            .map_err(|_| ReviewError::InvalidDateFormat(raw.to_string()))?;

        Ok(Self(compact))
    }

    /// 可选日期归一化。
    ///
    /// 空字符串与 `None` 都视为"未提供"，由调用方决定回退到最新交易日；
    /// 只有格式确实非法时才报错。
    pub fn parse_opt(raw: Option<&str>) -> ReviewResult<Option<Self>> {
        match raw {
            None => Ok(None),
            Some(s) if s.trim().is_empty() => Ok(None),
            Some(s) => Self::normalize(s).map(Some),
        }
    }

    /// 必填日期归一化。
    ///
    /// 未提供时返回 `MissingParameter`，携带参数名。
    pub fn require(raw: Option<&str>, name: &str) -> ReviewResult<Self> {
        match Self::parse_opt(raw)? {
            Some(date) => Ok(date),
            None => Err(ReviewError::MissingParameter(name.to_string())),
        }
    }

    /// 规范形式字符串（YYYYMMDD）。
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// ISO 形式（YYYY-MM-DD），用于面向人的展示。
    pub fn to_iso(&self) -> String {
        format!("{}-{}-{}", &self.0[..4], &self.0[4..6], &self.0[6..])
    }

    /// 转为日历日期。
    pub fn to_naive_date(&self) -> NaiveDate {
        // normalize 已保证可解析
        NaiveDate::parse_from_str(&self.0, "%Y%m%d")
            .unwrap_or_else(|_| NaiveDate::from_ymd_opt(1970, 1, 1).unwrap())
    }

    /// 是否落在周一至周五。
    pub fn is_weekday(&self) -> bool {
        !matches!(
            self.to_naive_date().weekday(),
            Weekday::Sat | Weekday::Sun
        )
    }
}

impl fmt::Display for TradeDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TradeDate {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::normalize(s)
    }
}
