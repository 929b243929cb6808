//! 复盘服务 API 入口。
//!
//! 启动 Axum 服务器：加载配置、连接数据仓库与 Redis、
//! 组合路由并带优雅停机地运行。

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use review_api::routes::create_api_router;
use review_api::state::AppState;
use review_core::{init_logging_from_env, AppConfig};
use sqlx::postgres::PgPoolOptions;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// AppState 初始化：按环境变量接入数据库与缓存。
///
/// 数据库连不上只记错误，服务降级启动（查询端点返回 503），
/// 方便在仓库维护窗口内仍能响应健康检查。
async fn create_app_state(config: &AppConfig) -> AppState {
    let mut state = AppState::new().with_cache_ttl(config.cache.ttl_secs);

    if let Ok(database_url) = std::env::var("DATABASE_URL") {
        match PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .acquire_timeout(Duration::from_secs(config.database.connection_timeout_secs))
            .idle_timeout(Duration::from_secs(config.database.idle_timeout_secs))
            .connect(&database_url)
            .await
        {
            Ok(pool) => {
                if sqlx::query("SELECT 1").fetch_one(&pool).await.is_ok() {
                    info!("数据仓库连接成功");
                    state = state.with_db_pool(pool);
                } else {
                    error!("数据仓库连通性验证失败");
                }
            }
            Err(e) => {
                error!("数据仓库连接失败: {}", e);
            }
        }
    } else {
        warn!("DATABASE_URL 未设置，查询端点将返回 503");
    }

    if let Ok(redis_url) = std::env::var("REDIS_URL") {
        state = state.with_redis_url(&redis_url).await;
    } else {
        warn!("REDIS_URL 未设置，缓存关闭");
    }

    state
}

/// CORS 中间件。
///
/// CORS_ORIGINS 未设置时视为开发模式，放行所有来源。
fn cors_layer() -> CorsLayer {
    let allow_origin = match std::env::var("CORS_ORIGINS") {
        Ok(origins) if !origins.is_empty() => {
            let origins: Vec<_> = origins
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();

            if origins.is_empty() {
                warn!("CORS_ORIGINS 设置了但没有合法来源，放行所有来源");
                AllowOrigin::any()
            } else {
                info!("CORS 允许 {} 个来源", origins.len());
                AllowOrigin::list(origins)
            }
        }
        _ => {
            warn!("CORS_ORIGINS 未设置，放行所有来源（开发模式）");
            AllowOrigin::any()
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        .max_age(Duration::from_secs(3600))
}

/// 全量路由加中间件。
fn create_router(state: Arc<AppState>) -> Router {
    create_api_router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // 全局超时，防止慢查询拖死连接
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(cors_layer())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    init_logging_from_env().map_err(|e| anyhow::anyhow!("日志初始化失败: {}", e))?;

    info!("启动复盘服务 API...");

    let config = AppConfig::load_default().unwrap_or_else(|e| {
        warn!("配置加载失败: {}，使用默认配置", e);
        AppConfig::default()
    });

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| {
            error!(
                host = %config.server.host,
                port = config.server.port,
                "监听地址无效"
            );
            anyhow::anyhow!("监听地址无效: {}", e)
        })?;

    let state = Arc::new(create_app_state(&config).await);

    info!(
        version = %state.version,
        has_db = state.db.is_some(),
        has_cache = state.has_cache(),
        cache_ttl_secs = state.cache_ttl_secs,
        "应用状态初始化完成"
    );

    let app = create_router(state);

    let shutdown_token = CancellationToken::new();

    info!(%addr, "API 服务器监听中");
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_token.clone()))
        .await?;

    info!("服务器开始停机，清理中...");
    shutdown_token.cancel();
    info!("服务器已优雅退出");

    Ok(())
}

/// 等待停机信号（Ctrl+C 或 SIGTERM）。
async fn shutdown_signal(shutdown_token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Ctrl+C 信号监听失败: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("SIGTERM 信号监听失败: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("收到 Ctrl+C，开始优雅停机...");
        }
        _ = terminate => {
            warn!("收到 SIGTERM，开始优雅停机...");
        }
    }

    shutdown_token.cancel();
}
