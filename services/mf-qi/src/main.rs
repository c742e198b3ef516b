//! mf-qi Service - Quality Inspection Dashboard

use std::sync::Arc;

use mf_qi::api::{AppState, DashboardPage, router};
use mf_qi::application::ServiceHandler;
use mf_qi::infrastructure::persistence::PostgresInspectionRepository;
use qms_bootstrap::{Infrastructure, run_server};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let config_dir = std::env::var("QMS_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    run_server(&config_dir, |infra: Infrastructure| async move {
        info!("Initializing mf-qi Service...");

        let config = infra.config();
        let repo = Arc::new(PostgresInspectionRepository::new(
            infra.postgres_pool(),
            &config.database.source_table,
        )?);
        info!(table = %config.database.source_table, "Inspection repository initialized");

        let handler = Arc::new(ServiceHandler::new(repo, config.dashboard.clone()));
        let page = DashboardPage::new()?;

        Ok(router(AppState::new(handler, page, infra.metrics_handle())))
    })
    .await
}
