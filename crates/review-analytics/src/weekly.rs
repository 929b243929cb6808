//! 周内规律分析。
//!
//! 把一段日线按星期几聚合：平均涨跌幅、上涨天数占比、平均成交额。
//! 无法解析日期的行跳过并记日志，不影响其余行。

use chrono::{Datelike, NaiveDate};
use review_core::sanitize::round2;
use review_data::warehouse::DailyBarRow;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// 单个星期几的聚合结果。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekdayPattern {
    /// 1=周一 ... 5=周五
    pub weekday: u32,
    pub weekday_name: String,
    pub avg_pct_chg: f64,
    /// 上涨天数占比（0~1）
    pub up_ratio: f64,
    pub avg_amount: f64,
    pub sample_count: usize,
}

/// 周内规律报表。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyPatternReport {
    pub ts_code: String,
    pub start_date: String,
    pub end_date: String,
    pub patterns: Vec<WeekdayPattern>,
}

fn weekday_name(idx: usize) -> &'static str {
    match idx {
        0 => "周一",
        1 => "周二",
        2 => "周三",
        3 => "周四",
        _ => "周五",
    }
}

/// 按星期几聚合日线序列。
///
/// 只产出样本数非零的星期；整段为空时返回空列表。
pub fn aggregate_by_weekday(bars: &[DailyBarRow]) -> Vec<WeekdayPattern> {
    // 下标 0..5 对应周一..周五；周末不应出现在交易数据里
    let mut sums = [(0.0f64, 0usize, 0.0f64, 0usize); 5];

    for bar in bars {
        let date = match NaiveDate::parse_from_str(&bar.trade_date, "%Y%m%d") {
            Ok(d) => d,
            Err(_) => {
                warn!(trade_date = %bar.trade_date, "Skipping bar with unparseable date");
                continue;
            }
        };

        let idx = date.weekday().num_days_from_monday() as usize;
        if idx >= 5 {
            continue;
        }

        let pct = bar.pct_chg.filter(|v| v.is_finite()).unwrap_or(0.0);
        let amount = bar.amount.filter(|v| v.is_finite()).unwrap_or(0.0);

        let (pct_sum, up_days, amount_sum, count) = &mut sums[idx];
        *pct_sum += pct;
        if pct > 0.0 {
            *up_days += 1;
        }
        *amount_sum += amount;
        *count += 1;
    }

    sums.iter()
        .enumerate()
        .filter(|(_, (_, _, _, count))| *count > 0)
        .map(|(idx, (pct_sum, up_days, amount_sum, count))| {
            let n = *count as f64;
            WeekdayPattern {
                weekday: idx as u32 + 1,
                weekday_name: weekday_name(idx).to_string(),
                avg_pct_chg: round2(pct_sum / n),
                up_ratio: round2(*up_days as f64 / n),
                avg_amount: round2(amount_sum / n),
                sample_count: *count,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(trade_date: &str, pct_chg: f64, amount: f64) -> DailyBarRow {
        DailyBarRow {
            trade_date: trade_date.to_string(),
            open: None,
            high: None,
            low: None,
            close: None,
            vol: None,
            amount: Some(amount),
            pct_chg: Some(pct_chg),
            turnover_rate_f: None,
            volume_ratio: None,
            brar_ar_bfq: None,
            brar_br_bfq: None,
            psy_bfq: None,
            psyma_bfq: None,
        }
    }

    #[test]
    fn test_aggregates_by_weekday() {
        // 2024-01-08 周一, 2024-01-15 周一, 2024-01-09 周二
        let bars = vec![
            bar("20240108", 2.0, 100.0),
            bar("20240115", -1.0, 200.0),
            bar("20240109", 0.5, 300.0),
        ];
        let patterns = aggregate_by_weekday(&bars);
        assert_eq!(patterns.len(), 2);

        let monday = &patterns[0];
        assert_eq!(monday.weekday, 1);
        assert_eq!(monday.sample_count, 2);
        assert_eq!(monday.avg_pct_chg, 0.5);
        assert_eq!(monday.up_ratio, 0.5);
        assert_eq!(monday.avg_amount, 150.0);

        let tuesday = &patterns[1];
        assert_eq!(tuesday.weekday, 2);
        assert_eq!(tuesday.sample_count, 1);
        assert_eq!(tuesday.up_ratio, 1.0);
    }

    #[test]
    fn test_bad_dates_are_skipped() {
        let bars = vec![bar("not-a-date", 1.0, 100.0), bar("20240110", 1.0, 100.0)];
        let patterns = aggregate_by_weekday(&bars);
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].weekday, 3); // 2024-01-10 周三
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate_by_weekday(&[]).is_empty());
    }
}
