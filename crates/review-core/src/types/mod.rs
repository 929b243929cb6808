//! 领域类型。

pub mod anomaly;
pub mod trade_date;
pub mod ts_code;

pub use anomaly::VolumeAnomalyType;
pub use trade_date::TradeDate;
pub use ts_code::{MarketBoard, TsCode, BENCHMARK_INDICES};
