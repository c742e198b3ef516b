//! 聚合视图
//!
//! 每次查询时从检验记录重新计算，只以分组键区分

mod control_chart;
mod period_aggregates;

pub use control_chart::{ControlChart, ControlChartPoint};
pub use period_aggregates::{
    DailyDefectMean, DailyInspection, ItemDefectCount, ItemDefectRanking, MonthlyInspection,
};
