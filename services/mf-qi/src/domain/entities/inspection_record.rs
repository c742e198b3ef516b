//! 品质检验记录

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::ItemCode;

/// 计算不良率时加在入库数量上的保护值，避免除零
pub const DEFECT_RATE_EPSILON: f64 = 1e-5;

/// 不良率（%）= 不良数量 / (入库数量 + ε) × 100
///
/// 入库数量为 0 时结果接近 0 而不是报错
pub fn defect_rate(bad_qty: f64, received_qty: f64) -> f64 {
    bad_qty / (received_qty + DEFECT_RATE_EPSILON) * 100.0
}

/// 一条检验记录（LQC_INSP 的一行），加载后不可变
///
/// 来源表的数量列可为空，空值保留为 `None`：求和时跳过，求均值时不计入个数，
/// 导出时写空字段
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectionRecord {
    item_code: ItemCode,
    bad_qty: Option<f64>,
    received_qty: Option<f64>,
    doc_date: NaiveDate,
}

impl InspectionRecord {
    pub fn new(
        item_code: impl Into<ItemCode>,
        bad_qty: f64,
        received_qty: f64,
        doc_date: NaiveDate,
    ) -> Self {
        Self::from_source(item_code, Some(bad_qty), Some(received_qty), doc_date)
    }

    /// 按来源行构造，数量可缺失
    pub fn from_source(
        item_code: impl Into<ItemCode>,
        bad_qty: Option<f64>,
        received_qty: Option<f64>,
        doc_date: NaiveDate,
    ) -> Self {
        Self {
            item_code: item_code.into(),
            bad_qty,
            received_qty,
            doc_date,
        }
    }

    pub fn item_code(&self) -> &ItemCode {
        &self.item_code
    }

    pub fn bad_qty(&self) -> Option<f64> {
        self.bad_qty
    }

    pub fn received_qty(&self) -> Option<f64> {
        self.received_qty
    }

    pub fn doc_date(&self) -> NaiveDate {
        self.doc_date
    }

    pub fn year(&self) -> i32 {
        self.doc_date.year()
    }

    /// 任一数量缺失时不良率也缺失
    pub fn defect_rate(&self) -> Option<f64> {
        Some(defect_rate(self.bad_qty?, self.received_qty?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defect_rate_zero_over_zero() {
        let rate = defect_rate(0.0, 0.0);
        assert!(rate.is_finite());
        assert!(rate.abs() < 1e-9);
    }

    #[test]
    fn test_defect_rate_regular() {
        let rate = defect_rate(5.0, 100.0);
        assert!((rate - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_record_accessors() {
        let date = NaiveDate::from_ymd_opt(2023, 3, 9).unwrap();
        let record = InspectionRecord::new("A-100", 2.0, 40.0, date);
        assert_eq!(record.item_code().as_str(), "A-100");
        assert_eq!(record.year(), 2023);
        assert_eq!(record.doc_date(), date);
        assert!((record.defect_rate().unwrap() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_missing_quantity_has_no_rate() {
        let date = NaiveDate::from_ymd_opt(2023, 3, 9).unwrap();
        let record = InspectionRecord::from_source("A-100", None, Some(40.0), date);
        assert_eq!(record.bad_qty(), None);
        assert_eq!(record.received_qty(), Some(40.0));
        assert_eq!(record.defect_rate(), None);

        let record = InspectionRecord::from_source("A-100", Some(1.0), None, date);
        assert_eq!(record.defect_rate(), None);
    }
}
