//! 数值清洗与单位换算。
//!
//! 仓库原始值可能是 NULL、NaN、Infinity 或定点小数。
//! 本模块把它们统一成可安全序列化为 JSON 的数值：
//! 非法值在非空字段归零，在可空字段保持为空。
//!
//! 金额单位换算是字段属性而非推断结果：
//! - `total_mv` / `float_mv` 以元计，除以 1e8 得亿元
//! - tushare 口径的 `amount` 以千元计，除以 1e5 得亿元
//! - `vol` 以手计（1 手 = 100 股）

/// 元 → 亿元 的固定除数。
pub const YUAN_TO_YI: f64 = 1e8;

/// 千元 → 亿元 的固定除数。
pub const THOUSAND_YUAN_TO_YI: f64 = 1e5;

/// 每手股数。
pub const SHARES_PER_LOT: f64 = 100.0;

/// 清洗单个浮点值：NaN / ±Inf → 0.0。
pub fn clean(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// 清洗非空字段：缺失视为"无量"，归零。
pub fn clean_or_zero(value: Option<f64>) -> f64 {
    value.map(clean).unwrap_or(0.0)
}

/// 清洗可空字段：缺失保持为空，非法值归零。
pub fn clean_nullable(value: Option<f64>) -> Option<f64> {
    value.map(clean)
}

/// 保留两位小数。
pub fn round2(value: f64) -> f64 {
    (clean(value) * 100.0).round() / 100.0
}

/// 元 → 亿元（两位小数）。
pub fn yuan_to_yi(value: f64) -> f64 {
    round2(clean(value) / YUAN_TO_YI)
}

/// 千元 → 亿元（两位小数）。
pub fn thousand_yuan_to_yi(value: f64) -> f64 {
    round2(clean(value) / THOUSAND_YUAN_TO_YI)
}

/// 手 → 股。
pub fn lots_to_shares(value: f64) -> f64 {
    clean(value) * SHARES_PER_LOT
}
