//! 检验记录聚合
//!
//! 所有函数都是纯函数：输入记录切片，输出按分组键排序的视图。
//! 缺失的数量不参与求和，也不计入均值的个数

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};

use crate::domain::entities::InspectionRecord;
use crate::domain::services::control_limits::{ControlLimitError, compute_control_limits};
use crate::domain::value_objects::ItemCode;
use crate::domain::views::{
    ControlChart, ControlChartPoint, DailyDefectMean, DailyInspection, ItemDefectCount,
    ItemDefectRanking, MonthlyInspection,
};

fn add_present(total: &mut f64, value: Option<f64>) {
    if let Some(value) = value {
        *total += value;
    }
}

/// 单据日期落在指定年份的记录
pub fn records_in_year(records: &[InspectionRecord], year: i32) -> Vec<&InspectionRecord> {
    records.iter().filter(|r| r.year() == year).collect()
}

/// 按日期汇总入库数量与不良数量，日期升序
pub fn daily_totals<'a, I>(records: I) -> Vec<DailyInspection>
where
    I: IntoIterator<Item = &'a InspectionRecord>,
{
    let mut by_date: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();
    for record in records {
        let entry = by_date.entry(record.doc_date()).or_default();
        add_present(&mut entry.0, record.received_qty());
        add_present(&mut entry.1, record.bad_qty());
    }

    by_date
        .into_iter()
        .map(|(date, (received_qty, bad_qty))| DailyInspection {
            date,
            received_qty,
            bad_qty,
        })
        .collect()
}

/// 按年月汇总，月份升序（只包含有记录的月份）
pub fn monthly_totals<'a, I>(records: I) -> Vec<MonthlyInspection>
where
    I: IntoIterator<Item = &'a InspectionRecord>,
{
    let mut by_month: BTreeMap<(i32, u32), (f64, f64)> = BTreeMap::new();
    for record in records {
        let date = record.doc_date();
        let entry = by_month.entry((date.year(), date.month())).or_default();
        add_present(&mut entry.0, record.received_qty());
        add_present(&mut entry.1, record.bad_qty());
    }

    by_month
        .into_iter()
        .map(|((year, month), (received_qty, bad_qty))| MonthlyInspection {
            year,
            month,
            received_qty,
            bad_qty,
        })
        .collect()
}

/// 品目不良排名
///
/// 按不良数量降序；数量相同时按品目编码升序，保证结果稳定
pub fn item_defect_ranking<'a, I>(year: i32, records: I, top_n: usize) -> ItemDefectRanking
where
    I: IntoIterator<Item = &'a InspectionRecord>,
{
    let mut by_item: HashMap<&ItemCode, f64> = HashMap::new();
    for record in records {
        add_present(by_item.entry(record.item_code()).or_default(), record.bad_qty());
    }

    let mut items: Vec<ItemDefectCount> = by_item
        .into_iter()
        .map(|(item_code, bad_qty)| ItemDefectCount {
            item_code: item_code.clone(),
            bad_qty,
        })
        .collect();

    items.sort_by(|a, b| match b.bad_qty.total_cmp(&a.bad_qty) {
        Ordering::Equal => a.item_code.cmp(&b.item_code),
        other => other,
    });

    let top = items.iter().take(top_n).cloned().collect();

    ItemDefectRanking { year, top, items }
}

/// 每日不良数量的平均值，日期升序
///
/// 只对有不良数量的记录求平均；某日全部缺失时该日不出现在结果中
pub fn daily_defect_means<'a, I>(records: I) -> Vec<DailyDefectMean>
where
    I: IntoIterator<Item = &'a InspectionRecord>,
{
    let mut by_date: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for record in records {
        if let Some(bad_qty) = record.bad_qty() {
            let entry = by_date.entry(record.doc_date()).or_default();
            entry.0 += bad_qty;
            entry.1 += 1;
        }
    }

    by_date
        .into_iter()
        .map(|(date, (sum, count))| DailyDefectMean {
            date,
            mean_bad_qty: sum / count as f64,
        })
        .collect()
}

/// 以每日平均不良数量为测量值构建控制图
pub fn build_control_chart(
    year: i32,
    means: Vec<DailyDefectMean>,
) -> Result<ControlChart, ControlLimitError> {
    let values: Vec<f64> = means.iter().map(|m| m.mean_bad_qty).collect();
    let limits = compute_control_limits(&values)?;

    let points = means
        .into_iter()
        .map(|m| ControlChartPoint {
            date: m.date,
            value: m.mean_bad_qty,
            out_of_control: limits
                .limits()
                .is_some_and(|l| l.is_out_of_control(m.mean_bad_qty)),
        })
        .collect();

    Ok(ControlChart {
        year,
        points,
        limits,
    })
}
