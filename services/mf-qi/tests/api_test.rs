mod common;

use std::sync::Arc;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use common::{InMemoryInspectionRepository, app, date, sample_records};
use mf_qi::domain::InspectionRecord;
use tower::ServiceExt;

async fn get(app: axum::Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

fn sample_app() -> axum::Router {
    app(Arc::new(InMemoryInspectionRepository::new(sample_records())))
}

#[tokio::test]
async fn test_health() {
    let response = get(sample_app(), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "healthy");
}

#[tokio::test]
async fn test_item_ranking_endpoint() {
    let response = get(sample_app(), "/api/inspection/items?year=2023&limit=1").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["year"], 2023);
    assert_eq!(json["top"].as_array().unwrap().len(), 1);
    assert_eq!(json["items"][0]["item_code"], "ITEM-A");
    assert_eq!(json["items"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_items_default_to_configured_year() {
    let response = get(sample_app(), "/api/inspection/items").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["year"], 2023);
}

#[tokio::test]
async fn test_year_without_records_is_not_found() {
    let response = get(sample_app(), "/api/inspection/monthly?year=2031").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/problem+json"
    );

    let json = body_json(response).await;
    assert_eq!(json["type"], "/problems/not-found");
    assert_eq!(json["status"], 404);
}

#[tokio::test]
async fn test_year_out_of_range_is_bad_request() {
    let response = get(sample_app(), "/api/inspection/control-chart?year=1990").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get(sample_app(), "/api/inspection/items?year=2023&limit=0").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_query_is_problem_json() {
    for uri in [
        "/api/inspection/monthly?year=abc",
        "/api/inspection/control-chart?year=2023.5",
        "/api/inspection/items?limit=abc",
    ] {
        let response = get(sample_app(), uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/problem+json"
        );

        let json = body_json(response).await;
        assert_eq!(json["type"], "/problems/validation");
        assert_eq!(json["status"], 400);
    }
}

#[tokio::test]
async fn test_missing_defect_quantities() {
    let records = vec![
        InspectionRecord::new("ITEM-A", 4.0, 10.0, date(2023, 1, 1)),
        InspectionRecord::from_source("ITEM-B", None, Some(5.0), date(2023, 1, 1)),
        InspectionRecord::from_source("ITEM-C", None, Some(7.0), date(2024, 3, 1)),
    ];
    let app = app(Arc::new(InMemoryInspectionRepository::new(records)));

    let response = get(app.clone(), "/api/inspection/control-chart?year=2023").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["points"][0]["value"], 4.0);

    // 2024 年只有缺失不良数量的记录
    let response = get(app.clone(), "/api/inspection/control-chart?year=2024").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let csv = body_text(get(app, "/api/inspection/export.csv").await).await;
    assert!(csv.lines().any(|line| line == "ITEM-B,,5,2023-01-01,"));
}

#[tokio::test]
async fn test_control_chart_endpoint() {
    let response = get(sample_app(), "/api/inspection/control-chart?year=2023").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["limits"]["status"], "defined");
    assert_eq!(json["points"].as_array().unwrap().len(), 4);
    assert_eq!(json["points"][0]["date"], "2023-01-03");

    let response = get(sample_app(), "/api/inspection/control-chart?year=2024").await;
    let json = body_json(response).await;
    assert_eq!(json["limits"]["status"], "undefined");
}

#[tokio::test]
async fn test_csv_export() {
    let response = get(sample_app(), "/api/inspection/export.csv").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/csv; charset=utf-8"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"inspection_data.csv\""
    );

    let csv = body_text(response).await;
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "ITEM_CD,QCBAD_QT,QCRCV_QT,DOC_DT,BAD_RATE");
    assert_eq!(lines.len(), 7);
    assert!(lines[1].starts_with("ITEM-A,4,100,2023-01-03,"));
    assert_eq!(lines[6], "\"ITEM-A, \"\"x\"\"\",0,0,2024-05-01,0");
}

#[tokio::test]
async fn test_database_failure_is_server_error() {
    let app = app(Arc::new(InMemoryInspectionRepository::unreachable()));
    let response = get(app, "/api/inspection/daily").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["type"], "/problems/database");
}

#[tokio::test]
async fn test_readiness() {
    let response = get(sample_app(), "/ready").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["ready"], true);

    let app = app(Arc::new(InMemoryInspectionRepository::unreachable()));
    let response = get(app, "/ready").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_metrics_without_recorder() {
    let response = get(sample_app(), "/metrics").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_dashboard_renders_all_sections() {
    let response = get(sample_app(), "/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("Quality Inspection Dashboard"));
    assert_eq!(html.matches("<svg").count(), 4);
    assert!(html.contains("ITEM-A"));
    assert!(html.contains("UCL:"));
    assert!(html.contains("/api/inspection/export.csv"));
    assert!(!html.contains("class=\"warning\""));
}

#[tokio::test]
async fn test_dashboard_warnings_keep_page_usable() {
    let response = get(
        sample_app(),
        "/?ranking_year=2031&monthly_year=abc&control_year=2024",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("No inspection records for year 2031"));
    assert!(html.contains("is not a valid year"));
    assert!(html.contains("UCL/LCL undefined"));
    // 日度图和控制图仍然渲染
    assert_eq!(html.matches("<svg").count(), 2);
}

#[tokio::test]
async fn test_dashboard_shows_error_banner_on_load_failure() {
    let app = app(Arc::new(InMemoryInspectionRepository::unreachable()));
    let response = get(app, "/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("class=\"error\""));
    assert!(!html.contains("<svg"));
}
