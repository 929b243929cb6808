//! 交易日历扩展点。
//!
//! 默认实现只做周内判断，不含法定节假日表：
//! 节假日会被当作普通交易日放行，通常只会查出空结果。
//! 接入真实交易日历时实现 [`TradingCalendar`] 即可，
//! 不需要改动任何调用方。

use crate::types::TradeDate;

/// 交易日历。
pub trait TradingCalendar: Send + Sync {
    /// 给定日期是否为交易日。
    fn is_trading_day(&self, date: &TradeDate) -> bool;
}

/// 仅按星期判断的默认日历。
#[derive(Debug, Clone, Copy, Default)]
pub struct WeekdayCalendar;

impl TradingCalendar for WeekdayCalendar {
    fn is_trading_day(&self, date: &TradeDate) -> bool {
        date.is_weekday()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekend_is_not_trading_day() {
        let cal = WeekdayCalendar;
        // 2024-01-06 周六 / 2024-01-07 周日
        assert!(!cal.is_trading_day(&TradeDate::normalize("20240106").unwrap()));
        assert!(!cal.is_trading_day(&TradeDate::normalize("20240107").unwrap()));
        assert!(cal.is_trading_day(&TradeDate::normalize("20240105").unwrap()));
    }

    #[test]
    fn test_holiday_passes_as_trading_day() {
        // 默认日历没有节假日表：元旦（周一）也被放行。
        // 这是当前已知的行为边界，接入真实日历前节假日按交易日处理。
        let cal = WeekdayCalendar;
        assert!(cal.is_trading_day(&TradeDate::normalize("20240101").unwrap()));
    }
}
