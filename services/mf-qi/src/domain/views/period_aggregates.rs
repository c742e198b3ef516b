use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::value_objects::ItemCode;

/// 按单据日期汇总的检验数量
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyInspection {
    pub date: NaiveDate,
    pub received_qty: f64,
    pub bad_qty: f64,
}

/// 某年某月汇总的检验数量
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyInspection {
    pub year: i32,
    pub month: u32,
    pub received_qty: f64,
    pub bad_qty: f64,
}

impl MonthlyInspection {
    /// `YYYY-MM` 形式的期间标签
    pub fn period_label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

/// 某品目的不良数量合计
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemDefectCount {
    pub item_code: ItemCode,
    pub bad_qty: f64,
}

/// 某年的品目不良排名（按不良数量降序）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemDefectRanking {
    pub year: i32,
    /// 柱状图只展示前 N 个
    pub top: Vec<ItemDefectCount>,
    /// 表格展示全部品目
    pub items: Vec<ItemDefectCount>,
}

/// 某日不良数量的平均值（控制图的测量点）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyDefectMean {
    pub date: NaiveDate,
    pub mean_bad_qty: f64,
}
