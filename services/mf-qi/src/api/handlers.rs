//! HTTP 处理函数

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use qms_common::ReadinessReport;
use qms_errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::application::{ItemRankingQuery, YearQuery};
use crate::domain::views::{ControlChart, DailyInspection, ItemDefectRanking, MonthlyInspection};

use super::dashboard::DashboardParams;
use super::routes::AppState;

/// JSON 接口的年份参数，缺省取配置的默认年份
#[derive(Debug, Deserialize)]
pub struct YearParams {
    pub year: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct ItemParams {
    pub year: Option<i32>,
    pub limit: Option<usize>,
}

/// 查询参数解析失败时返回与其他校验错误相同的 problem+json 响应
fn query_params<T>(params: Result<Query<T>, QueryRejection>) -> AppResult<T> {
    params
        .map(|Query(params)| params)
        .map_err(|e| AppError::validation(format!("Invalid query parameters: {}", e.body_text())))
}

pub async fn dashboard(
    State(state): State<AppState>,
    Query(params): Query<DashboardParams>,
) -> AppResult<Html<String>> {
    let html = state.page.render(&state.handler, &params).await?;
    Ok(Html(html))
}

pub async fn daily_inspection(State(state): State<AppState>) -> AppResult<Json<Vec<DailyInspection>>> {
    Ok(Json(state.handler.daily_inspection().await?))
}

pub async fn item_defect_ranking(
    State(state): State<AppState>,
    params: Result<Query<ItemParams>, QueryRejection>,
) -> AppResult<Json<ItemDefectRanking>> {
    let params = query_params(params)?;
    let query = ItemRankingQuery {
        year: params.year.unwrap_or(state.handler.config().default_year),
        limit: params.limit,
    };
    Ok(Json(state.handler.item_defect_ranking(query).await?))
}

pub async fn monthly_inspection(
    State(state): State<AppState>,
    params: Result<Query<YearParams>, QueryRejection>,
) -> AppResult<Json<Vec<MonthlyInspection>>> {
    let params = query_params(params)?;
    let query = YearQuery::new(params.year.unwrap_or(state.handler.config().default_year));
    Ok(Json(state.handler.monthly_inspection(query).await?))
}

pub async fn control_chart(
    State(state): State<AppState>,
    params: Result<Query<YearParams>, QueryRejection>,
) -> AppResult<Json<ControlChart>> {
    let params = query_params(params)?;
    let query = YearQuery::new(params.year.unwrap_or(state.handler.config().default_year));
    Ok(Json(state.handler.control_chart(query).await?))
}

pub async fn export_csv(State(state): State<AppState>) -> AppResult<Response> {
    let csv = state.handler.export_csv().await?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        state.handler.config().export_file_name
    );
    let disposition = HeaderValue::from_str(&disposition)
        .map_err(|e| AppError::internal(format!("Invalid export file name: {}", e)))?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("text/csv; charset=utf-8")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response())
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<ReadinessReport>) {
    let report = state.handler.readiness().await;
    let status = if report.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(report))
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => AppError::unavailable("Metrics recorder is not installed").into_response(),
    }
}
