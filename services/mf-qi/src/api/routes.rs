//! 路由定义

use std::sync::Arc;

use axum::{Router, routing::get};
use metrics_exporter_prometheus::PrometheusHandle;

use crate::application::ServiceHandler;

use super::dashboard::DashboardPage;
use super::handlers;

/// 路由共享状态
#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<ServiceHandler>,
    pub page: Arc<DashboardPage>,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(handler: Arc<ServiceHandler>, page: DashboardPage, metrics: Option<PrometheusHandle>) -> Self {
        Self {
            handler,
            page: Arc::new(page),
            metrics,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::dashboard))
        .route("/api/inspection/daily", get(handlers::daily_inspection))
        .route("/api/inspection/items", get(handlers::item_defect_ranking))
        .route("/api/inspection/monthly", get(handlers::monthly_inspection))
        .route("/api/inspection/control-chart", get(handlers::control_chart))
        .route("/api/inspection/export.csv", get(handlers::export_csv))
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics))
        .with_state(state)
}
