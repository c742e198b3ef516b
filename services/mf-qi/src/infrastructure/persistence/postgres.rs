//! PostgreSQL repository implementation

use async_trait::async_trait;
use qms_adapter_postgres::{check_connection, validate_table_name};
use qms_errors::{AppError, AppResult};
use sqlx::PgPool;
use tracing::{debug, warn};

use crate::domain::entities::InspectionRecord;
use crate::domain::repositories::InspectionRepository;

use super::converters::inspection_records_from_rows;
use super::rows::InspectionRow;

pub struct PostgresInspectionRepository {
    pool: PgPool,
    query: String,
}

impl PostgresInspectionRepository {
    /// 表名在构造时校验，之后直接拼接进查询语句
    pub fn new(pool: PgPool, table: &str) -> AppResult<Self> {
        let table = validate_table_name(table)?;
        let query = format!(
            r#"
            SELECT CAST(item_cd AS text) AS item_cd,
                   CAST(qcbad_qt AS double precision) AS qcbad_qt,
                   CAST(qcrcv_qt AS double precision) AS qcrcv_qt,
                   CAST(doc_dt AS text) AS doc_dt
            FROM {}
            "#,
            table
        );

        Ok(Self { pool, query })
    }
}

#[async_trait]
impl InspectionRepository for PostgresInspectionRepository {
    async fn fetch_all(&self) -> AppResult<Vec<InspectionRecord>> {
        let rows = sqlx::query_as::<_, InspectionRow>(&self.query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to query inspection records: {}", e)))?;

        let total = rows.len();
        let converted = inspection_records_from_rows(rows)
            .map_err(|e| AppError::internal(format!("Malformed inspection record: {}", e)))?;

        if converted.skipped > 0 {
            warn!(skipped = converted.skipped, "Inspection rows without document date skipped");
        }
        debug!(rows = total, records = converted.records.len(), "Inspection records fetched");

        Ok(converted.records)
    }

    async fn ping(&self) -> AppResult<()> {
        check_connection(&self.pool).await
    }
}
