//! 集成测试公共工具

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use chrono::NaiveDate;
use mf_qi::api::{AppState, DashboardPage, router};
use mf_qi::application::ServiceHandler;
use mf_qi::domain::{InspectionRecord, InspectionRepository};
use qms_config::DashboardConfig;
use qms_errors::{AppError, AppResult};

/// 内存仓储，记录 fetch_all 的调用次数
pub struct InMemoryInspectionRepository {
    records: Vec<InspectionRecord>,
    fetches: AtomicUsize,
    /// 前 N 次 fetch_all 返回数据库错误
    failures_before_success: usize,
    reachable: bool,
}

impl InMemoryInspectionRepository {
    pub fn new(records: Vec<InspectionRecord>) -> Self {
        Self {
            records,
            fetches: AtomicUsize::new(0),
            failures_before_success: 0,
            reachable: true,
        }
    }

    pub fn failing(records: Vec<InspectionRecord>, failures: usize) -> Self {
        Self {
            failures_before_success: failures,
            ..Self::new(records)
        }
    }

    pub fn unreachable() -> Self {
        Self {
            failures_before_success: usize::MAX,
            reachable: false,
            ..Self::new(Vec::new())
        }
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InspectionRepository for InMemoryInspectionRepository {
    async fn fetch_all(&self) -> AppResult<Vec<InspectionRecord>> {
        let attempt = self.fetches.fetch_add(1, Ordering::SeqCst);
        if attempt < self.failures_before_success {
            return Err(AppError::database("connection refused"));
        }
        Ok(self.records.clone())
    }

    async fn ping(&self) -> AppResult<()> {
        if self.reachable {
            Ok(())
        } else {
            Err(AppError::database("connection refused"))
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// 2023 年三个品目、两个月的记录，外加一条 2024 年的记录
pub fn sample_records() -> Vec<InspectionRecord> {
    vec![
        InspectionRecord::new("ITEM-A", 4.0, 100.0, date(2023, 1, 3)),
        InspectionRecord::new("ITEM-B", 2.0, 50.0, date(2023, 1, 3)),
        InspectionRecord::new("ITEM-A", 6.0, 120.0, date(2023, 1, 4)),
        InspectionRecord::new("ITEM-C", 1.0, 80.0, date(2023, 2, 10)),
        InspectionRecord::new("ITEM-B", 3.0, 60.0, date(2023, 2, 11)),
        InspectionRecord::new("ITEM-A, \"x\"", 0.0, 0.0, date(2024, 5, 1)),
    ]
}

pub fn handler(repo: Arc<InMemoryInspectionRepository>) -> Arc<ServiceHandler> {
    Arc::new(ServiceHandler::new(repo, DashboardConfig::default()))
}

pub fn app(repo: Arc<InMemoryInspectionRepository>) -> Router {
    let page = DashboardPage::new().unwrap();
    router(AppState::new(handler(repo), page, None))
}
