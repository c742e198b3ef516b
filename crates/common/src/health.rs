//! 健康检查类型
//!
//! `/health` 只表示进程存活；`/ready` 汇总各依赖组件的检查结果

use std::future::Future;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::warn;

/// 单个组件的检查结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    /// 组件名称
    pub name: String,
    /// 是否健康
    pub healthy: bool,
    /// 延迟（毫秒）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    /// 错误信息
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ComponentHealth {
    pub fn healthy(name: impl Into<String>, latency_ms: u64) -> Self {
        Self {
            name: name.into(),
            healthy: true,
            latency_ms: Some(latency_ms),
            error: None,
        }
    }

    pub fn unhealthy(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            healthy: false,
            latency_ms: None,
            error: Some(error.into()),
        }
    }
}

/// 就绪检查汇总
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReadinessReport {
    pub ready: bool,
    pub components: Vec<ComponentHealth>,
}

impl ReadinessReport {
    pub fn new() -> Self {
        Self {
            ready: true,
            components: Vec::new(),
        }
    }

    pub fn push(&mut self, component: ComponentHealth) {
        if !component.healthy {
            self.ready = false;
        }
        self.components.push(component);
    }

    pub fn healthy_count(&self) -> usize {
        self.components.iter().filter(|c| c.healthy).count()
    }
}

/// 在超时限制内执行一次检查，并记录耗时
pub async fn timed_check<F, E>(name: &str, timeout: Duration, check: F) -> ComponentHealth
where
    F: Future<Output = Result<(), E>>,
    E: std::fmt::Display,
{
    let started = Instant::now();

    match tokio::time::timeout(timeout, check).await {
        Ok(Ok(())) => ComponentHealth::healthy(name, started.elapsed().as_millis() as u64),
        Ok(Err(e)) => {
            warn!(component = name, error = %e, "Readiness check failed");
            ComponentHealth::unhealthy(name, e.to_string())
        }
        Err(_) => {
            warn!(component = name, timeout_ms = timeout.as_millis() as u64, "Readiness check timed out");
            ComponentHealth::unhealthy(name, "Health check timed out")
        }
    }
}
