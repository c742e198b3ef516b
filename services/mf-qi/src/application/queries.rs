//! 看板查询

use qms_config::DashboardConfig;
use serde::Deserialize;

use crate::error::{InspectionError, ServiceResult};

fn check_year(year: i32, config: &DashboardConfig) -> ServiceResult<()> {
    if config.year_in_range(year) {
        Ok(())
    } else {
        Err(InspectionError::YearOutOfRange {
            year,
            min: config.min_year,
            max: config.max_year,
        })
    }
}

/// 按年份筛选的查询（月度汇总、控制图）
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct YearQuery {
    pub year: i32,
}

impl YearQuery {
    pub fn new(year: i32) -> Self {
        Self { year }
    }

    pub fn validate(&self, config: &DashboardConfig) -> ServiceResult<()> {
        check_year(self.year, config)
    }
}

/// 品目不良排名查询
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ItemRankingQuery {
    pub year: i32,
    /// 柱状图条数，缺省取配置的 `top_items`
    pub limit: Option<usize>,
}

impl ItemRankingQuery {
    pub fn new(year: i32) -> Self {
        Self { year, limit: None }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn validate(&self, config: &DashboardConfig) -> ServiceResult<()> {
        check_year(self.year, config)?;
        if self.limit == Some(0) {
            return Err(InspectionError::InvalidLimit);
        }
        Ok(())
    }

    pub fn effective_limit(&self, config: &DashboardConfig) -> usize {
        self.limit.unwrap_or(config.top_items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_bounds() {
        let config = DashboardConfig::default();
        assert!(YearQuery::new(2000).validate(&config).is_ok());
        assert!(YearQuery::new(2100).validate(&config).is_ok());
        assert!(matches!(
            YearQuery::new(1999).validate(&config),
            Err(InspectionError::YearOutOfRange { year: 1999, .. })
        ));
        assert!(YearQuery::new(2101).validate(&config).is_err());
    }

    #[test]
    fn test_ranking_limit() {
        let config = DashboardConfig::default();
        let query = ItemRankingQuery::new(2023);
        assert_eq!(query.effective_limit(&config), 10);
        assert_eq!(query.with_limit(3).effective_limit(&config), 3);
        assert!(matches!(
            query.with_limit(0).validate(&config),
            Err(InspectionError::InvalidLimit)
        ));
    }
}
