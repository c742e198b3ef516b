//! 检验数据集缓存
//!
//! 首次请求时从仓储加载全部记录，之后整个进程内只读共享

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use qms_errors::AppResult;
use tokio::sync::OnceCell;
use tracing::{error, info};

use crate::domain::entities::InspectionRecord;
use crate::domain::repositories::InspectionRepository;

/// 一次加载得到的全部检验记录
#[derive(Debug)]
pub struct InspectionDataset {
    records: Vec<InspectionRecord>,
    loaded_at: DateTime<Utc>,
}

impl InspectionDataset {
    pub fn new(records: Vec<InspectionRecord>) -> Self {
        Self {
            records,
            loaded_at: Utc::now(),
        }
    }

    pub fn records(&self) -> &[InspectionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

/// 数据集缓存
///
/// 并发的首次请求只触发一次加载；加载失败不缓存，下一次请求重新加载
pub struct DatasetCache {
    repo: Arc<dyn InspectionRepository>,
    cell: OnceCell<Arc<InspectionDataset>>,
}

impl DatasetCache {
    pub fn new(repo: Arc<dyn InspectionRepository>) -> Self {
        Self {
            repo,
            cell: OnceCell::new(),
        }
    }

    pub async fn get(&self) -> AppResult<Arc<InspectionDataset>> {
        self.cell
            .get_or_try_init(|| self.load())
            .await
            .map(Arc::clone)
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }

    async fn load(&self) -> AppResult<Arc<InspectionDataset>> {
        let started = Instant::now();

        match self.repo.fetch_all().await {
            Ok(records) => {
                let elapsed = started.elapsed();
                metrics::counter!("qi_dataset_loads_total", "outcome" => "success").increment(1);
                metrics::histogram!("qi_dataset_load_seconds").record(elapsed.as_secs_f64());
                metrics::gauge!("qi_dataset_records").set(records.len() as f64);
                info!(
                    records = records.len(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Inspection dataset loaded"
                );
                Ok(Arc::new(InspectionDataset::new(records)))
            }
            Err(e) => {
                metrics::counter!("qi_dataset_loads_total", "outcome" => "failure").increment(1);
                error!(error = %e, "Failed to load inspection dataset");
                Err(e)
            }
        }
    }
}
