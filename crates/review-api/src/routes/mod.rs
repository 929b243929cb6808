//! API 路由。
//!
//! # 路由结构
//!
//! - `/health`、`/health/ready` - 健康检查
//! - `/api/review/overview` - 大盘概览（基准指数 + 市场宽度）
//! - `/api/review/sector-flow` - 板块资金流向
//! - `/api/review/top-list` - 龙虎榜
//! - `/api/review/concepts` - 热门概念
//! - `/api/review/daily-review` - 每日复盘六分项聚合
//! - `/api/review/limit-up` - 涨停板列表（带过滤）
//! - `/api/review/limit-analysis` - 涨停分析十分项聚合
//! - `/api/review/technical` - 龙虎榜个股指标快照
//! - `/api/review/technical/{ts_code}` - 单股指标窗口标注
//! - `/api/review/volume/market` - 市场量能与量比分布
//! - `/api/review/volume/anomaly` - 按异动类型筛选个股
//! - `/api/review/volume/stock/{ts_code}` - 单股多标签异动分类
//! - `/api/review/kline/{ts_code}` - 单股 K 线窗口
//! - `/api/review/stock/compare` - 股票对比（重定基）
//! - `/api/review/weekly/{ts_code}` - 周内规律

pub mod compare;
pub mod health;
pub mod limit;
pub mod review;
pub mod technical;
pub mod volume_price;
pub mod weekly;

pub use compare::{compare_router, CompareRequest};
pub use health::{health_router, ComponentHealth, ComponentStatus, HealthResponse};
pub use limit::{limit_router, LimitUpParams};
pub use review::{review_router, DateParams, OverviewResponse};
pub use technical::{technical_router, TechnicalParams};
pub use volume_price::{
    volume_price_router, AnomalyParams, KlineParams, MarketVolumeResponse, StockVolumeResponse,
};
pub use weekly::{weekly_router, RangeParams};

use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

/// 组合全部 API 路由。
pub fn create_api_router() -> Router<Arc<AppState>> {
    let review_routes = Router::new()
        .merge(review_router())
        .merge(limit_router())
        .merge(technical_router())
        .merge(volume_price_router())
        .merge(compare_router())
        .merge(weekly_router());

    Router::new()
        .nest("/health", health_router())
        .nest("/api/review", review_routes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::create_test_state;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_router_wires_all_route_groups() {
        let app = create_api_router().with_state(Arc::new(create_test_state()));

        for uri in [
            "/health",
            "/api/review/overview?date=20240105",
            "/api/review/limit-up?date=20240105",
            "/api/review/technical/000001.SZ",
            "/api/review/volume/market?date=20240105",
            "/api/review/weekly/000001.SZ?start_date=20240101&end_date=20240131",
        ] {
            let response = app
                .clone()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_ne!(response.status(), StatusCode::NOT_FOUND, "uri {}", uri);
        }
    }
}
