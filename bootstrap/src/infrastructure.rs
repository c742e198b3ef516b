//! 基础设施资源管理

use qms_adapter_postgres::{PostgresConfig, create_pool};
use qms_common::{RetryPolicy, retry_transient};
use qms_config::AppConfig;
use qms_errors::AppResult;
use metrics_exporter_prometheus::PrometheusHandle;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use tracing::{info, warn};

/// 基础设施资源容器
///
/// 由 bootstrap 统一初始化后交给服务构建路由
pub struct Infrastructure {
    /// 应用配置
    config: AppConfig,
    /// PostgreSQL 连接池
    postgres_pool: PgPool,
    /// Prometheus 指标句柄（未启用时为 None）
    metrics_handle: Option<PrometheusHandle>,
}

impl Infrastructure {
    /// 从配置创建基础设施资源（带重试）
    pub async fn from_config(config: AppConfig) -> AppResult<Self> {
        let pg_config = PostgresConfig::new(config.database.url.expose_secret())
            .with_max_connections(config.database.max_connections);

        let postgres_pool = retry_transient(&RetryPolicy::default(), "PostgreSQL connection", || {
            let cfg = pg_config.clone();
            async move { create_pool(&cfg).await }
        })
        .await?;
        info!(
            max_connections = config.database.max_connections,
            "PostgreSQL connection pool created"
        );

        let metrics_handle = if config.telemetry.metrics_enabled {
            match qms_telemetry::init_metrics() {
                Ok(handle) => Some(handle),
                Err(e) => {
                    warn!(error = %e, "Prometheus recorder not installed, /metrics disabled");
                    None
                }
            }
        } else {
            None
        };

        Ok(Self {
            config,
            postgres_pool,
            metrics_handle,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// 连接池是引用计数的，clone 开销很小
    pub fn postgres_pool(&self) -> PgPool {
        self.postgres_pool.clone()
    }

    pub fn metrics_handle(&self) -> Option<PrometheusHandle> {
        self.metrics_handle.clone()
    }
}
