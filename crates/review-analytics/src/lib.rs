//! 复盘后处理层。
//!
//! 这一层不访问数据库，只对取数层返回的行做纯函数加工：
//! - 量价异动分类（多标签规则表）
//! - 股票对比重定基（相对首日收盘价的涨跌幅）
//! - 技术指标标注（趋势、均线排列、KDJ 信号）
//! - 周内规律聚合

pub mod anomaly;
pub mod compare;
pub mod technical;
pub mod weekly;

pub use anomaly::{classify, Anomaly, AnomalyInput, AnomalyLabel, Severity};
pub use compare::{build_series, rebase, ComparisonBar, ComparisonResult, ComparisonSeries};
pub use technical::{
    annotate_day, annotate_window, DailyTechnicalAnalysis, KdjSignal, TechnicalReport, Trend,
};
pub use weekly::{aggregate_by_weekday, WeekdayPattern, WeeklyPatternReport};
