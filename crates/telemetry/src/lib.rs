//! qms-telemetry - 可观测性库

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// 初始化 tracing
pub fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// 初始化 JSON 格式的 tracing（生产环境）
pub fn init_tracing_json(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().json())
        .init();
}

/// 初始化 Prometheus metrics
///
/// 全局 recorder 只能安装一次，重复调用返回错误
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    describe_metrics();
    Ok(handle)
}

/// 注册看板服务用到的指标说明
fn describe_metrics() {
    metrics::describe_counter!(
        "qi_dataset_loads_total",
        "Number of inspection dataset loads from the database"
    );
    metrics::describe_gauge!(
        "qi_dataset_records",
        "Inspection records held in the dataset cache"
    );
    metrics::describe_histogram!(
        "qi_dataset_load_seconds",
        metrics::Unit::Seconds,
        "Time spent loading the inspection dataset"
    );
    metrics::describe_counter!(
        "qi_dashboard_renders_total",
        "Dashboard page renders"
    );
    metrics::describe_counter!(
        "qi_year_without_data_total",
        "Year-scoped queries that matched no inspection records"
    );
}
