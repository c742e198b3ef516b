use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::services::ControlLimitsOutcome;

/// 控制图上的一个期间
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlChartPoint {
    pub date: NaiveDate,
    pub value: f64,
    /// 超出 UCL/LCL（控制限未定义时恒为 false）
    pub out_of_control: bool,
}

/// 某年的不良数量控制图
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlChart {
    pub year: i32,
    pub points: Vec<ControlChartPoint>,
    pub limits: ControlLimitsOutcome,
}

impl ControlChart {
    pub fn out_of_control_count(&self) -> usize {
        self.points.iter().filter(|p| p.out_of_control).count()
    }

    pub fn is_in_control(&self) -> bool {
        self.out_of_control_count() == 0
    }
}
