//! 所有处理器共享的应用状态。
//!
//! AppState 被 Arc 包裹后注入 Axum 的 State extractor。
//! 数据库与缓存都是可选的：没有数据库时查询端点返回 503，
//! 没有缓存时所有端点直接落库，只影响延迟不影响语义。

use review_data::RedisCache;
use std::sync::Arc;

/// 应用共享状态。
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL 数据仓库连接池
    pub db: Option<sqlx::PgPool>,

    /// Redis 缓存（旁路加速层）
    pub cache: Option<Arc<RedisCache>>,

    /// 复盘报表缓存 TTL（秒）
    pub cache_ttl_secs: u64,

    /// 服务启动时间（计算运行时长用）
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 版本
    pub version: String,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            db: None,
            cache: None,
            cache_ttl_secs: 300,
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 设置数据库连接池。
    pub fn with_db_pool(mut self, pool: sqlx::PgPool) -> Self {
        self.db = Some(pool);
        self
    }

    /// 设置 Redis 缓存。
    pub fn with_cache(mut self, cache: RedisCache) -> Self {
        self.cache = Some(Arc::new(cache));
        self
    }

    /// 设置缓存 TTL。
    pub fn with_cache_ttl(mut self, ttl_secs: u64) -> Self {
        self.cache_ttl_secs = ttl_secs;
        self
    }

    /// 从 Redis URL 建立缓存连接（便捷方法）。
    ///
    /// 连接失败只记日志，服务无缓存继续运行。
    pub async fn with_redis_url(mut self, redis_url: &str) -> Self {
        let config = review_data::RedisConfig {
            url: redis_url.to_string(),
            default_ttl_secs: self.cache_ttl_secs,
        };
        match RedisCache::connect(&config).await {
            Ok(cache) => {
                tracing::info!("Redis 缓存连接成功");
                self.cache = Some(Arc::new(cache));
            }
            Err(e) => {
                tracing::warn!("Redis 缓存连接失败: {}，无缓存继续运行", e);
            }
        }
        self
    }

    /// 服务运行时长（秒）。
    pub fn uptime_secs(&self) -> i64 {
        chrono::Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds()
    }

    /// 数据库连通性探测。
    pub async fn is_db_healthy(&self) -> bool {
        if let Some(pool) = &self.db {
            sqlx::query("SELECT 1").fetch_one(pool).await.is_ok()
        } else {
            false
        }
    }

    /// Redis 连通性探测。
    pub async fn is_redis_healthy(&self) -> bool {
        if let Some(cache) = &self.cache {
            cache.health_check().await.unwrap_or(false)
        } else {
            false
        }
    }

    pub fn has_cache(&self) -> bool {
        self.cache.is_some()
    }

    // ==================== 缓存旁路工具 ====================

    /// 读缓存。未配置缓存或读取失败都返回 None。
    pub async fn cache_get<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        if let Some(cache) = &self.cache {
            match cache.get(key).await {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!(key = %key, "缓存读取失败: {}", e);
                    None
                }
            }
        } else {
            None
        }
    }

    /// 写缓存。失败只记日志，从不向上冒泡。
    pub async fn cache_set<T: serde::Serialize>(&self, key: &str, value: &T) {
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.set_with_ttl(key, value, self.cache_ttl_secs).await {
                tracing::warn!(key = %key, "缓存写入失败: {}", e);
            }
        }
    }
}

/// 测试用 AppState：无数据库、无缓存。
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state() -> AppState {
    AppState::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bare_state_reports_unhealthy() {
        let state = create_test_state();
        assert!(!state.is_db_healthy().await);
        assert!(!state.is_redis_healthy().await);
        assert!(!state.has_cache());
    }

    #[tokio::test]
    async fn test_cache_ops_are_noops_without_cache() {
        let state = create_test_state();
        state.cache_set("k", &42).await;
        let value: Option<i32> = state.cache_get("k").await;
        assert!(value.is_none());
    }

    #[test]
    fn test_uptime_is_nonnegative() {
        let state = AppState::new().with_cache_ttl(60);
        assert_eq!(state.cache_ttl_secs, 60);
        assert!(state.uptime_secs() >= 0);
        assert!(!state.version.is_empty());
    }
}
