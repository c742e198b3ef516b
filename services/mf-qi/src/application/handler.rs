//! Business logic handler

use std::sync::Arc;
use std::time::Duration;

use qms_common::{ReadinessReport, timed_check};
use qms_config::DashboardConfig;
use tracing::{debug, info};

use crate::domain::entities::InspectionRecord;
use crate::domain::repositories::InspectionRepository;
use crate::domain::services::{
    build_control_chart, daily_defect_means, daily_totals, item_defect_ranking, monthly_totals,
    records_in_year,
};
use crate::domain::views::{ControlChart, DailyInspection, ItemDefectRanking, MonthlyInspection};
use crate::error::{InspectionError, ServiceResult};

use super::csv_export::build_csv;
use super::dataset::DatasetCache;
use super::queries::{ItemRankingQuery, YearQuery};

const READINESS_TIMEOUT: Duration = Duration::from_secs(3);

pub struct ServiceHandler {
    repo: Arc<dyn InspectionRepository>,
    dataset: DatasetCache,
    config: DashboardConfig,
}

impl ServiceHandler {
    pub fn new(repo: Arc<dyn InspectionRepository>, config: DashboardConfig) -> Self {
        Self {
            dataset: DatasetCache::new(repo.clone()),
            repo,
            config,
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// 全部数据的每日入库/不良数量
    pub async fn daily_inspection(&self) -> ServiceResult<Vec<DailyInspection>> {
        let dataset = self.dataset.get().await?;
        Ok(daily_totals(dataset.records()))
    }

    /// 某年的品目不良排名
    pub async fn item_defect_ranking(
        &self,
        query: ItemRankingQuery,
    ) -> ServiceResult<ItemDefectRanking> {
        query.validate(&self.config)?;
        let limit = query.effective_limit(&self.config);

        let dataset = self.dataset.get().await?;
        let records = self.year_records(dataset.records(), query.year)?;

        let ranking = item_defect_ranking(query.year, records, limit);
        debug!(year = query.year, items = ranking.items.len(), "Item defect ranking computed");
        Ok(ranking)
    }

    /// 某年的月度入库/不良数量
    pub async fn monthly_inspection(&self, query: YearQuery) -> ServiceResult<Vec<MonthlyInspection>> {
        query.validate(&self.config)?;

        let dataset = self.dataset.get().await?;
        let records = self.year_records(dataset.records(), query.year)?;

        Ok(monthly_totals(records))
    }

    /// 某年每日平均不良数量的控制图
    pub async fn control_chart(&self, query: YearQuery) -> ServiceResult<ControlChart> {
        query.validate(&self.config)?;

        let dataset = self.dataset.get().await?;
        let records = self.year_records(dataset.records(), query.year)?;

        // 全年不良数量都缺失时没有可用的测量值
        let means = daily_defect_means(records);
        if means.is_empty() {
            metrics::counter!("qi_year_without_data_total").increment(1);
            return Err(InspectionError::NoRecordsForYear(query.year));
        }

        let chart = build_control_chart(query.year, means)?;
        if !chart.is_in_control() {
            info!(
                year = query.year,
                out_of_control = chart.out_of_control_count(),
                "Control chart has periods outside the limits"
            );
        }
        Ok(chart)
    }

    /// 导出全部记录（含不良率）为 CSV
    pub async fn export_csv(&self) -> ServiceResult<String> {
        let dataset = self.dataset.get().await?;
        info!(records = dataset.len(), "Exporting inspection data as CSV");
        Ok(build_csv(dataset.records()))
    }

    /// 就绪检查：数据库可达
    pub async fn readiness(&self) -> ReadinessReport {
        let mut report = ReadinessReport::new();
        report.push(timed_check("postgres", READINESS_TIMEOUT, self.repo.ping()).await);
        report
    }

    fn year_records<'a>(
        &self,
        records: &'a [InspectionRecord],
        year: i32,
    ) -> ServiceResult<Vec<&'a InspectionRecord>> {
        let matched = records_in_year(records, year);
        if matched.is_empty() {
            metrics::counter!("qi_year_without_data_total").increment(1);
            return Err(InspectionError::NoRecordsForYear(year));
        }
        Ok(matched)
    }
}
