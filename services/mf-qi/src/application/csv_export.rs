//! CSV 导出
//!
//! 原始列加上派生的不良率，按加载顺序输出；缺失的数量和无法计算的不良率输出为空字段

use std::fmt::Write;

use crate::domain::entities::InspectionRecord;

pub const CSV_HEADER: &str = "ITEM_CD,QCBAD_QT,QCRCV_QT,DOC_DT,BAD_RATE";

/// 含逗号、引号或换行的字段加引号，内部引号双写
fn escape_csv(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn optional_field(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

pub fn build_csv(records: &[InspectionRecord]) -> String {
    let mut csv = String::with_capacity(64 * (records.len() + 1));
    csv.push_str(CSV_HEADER);
    csv.push('\n');

    for record in records {
        // 写入 String 不会失败
        let _ = writeln!(
            csv,
            "{},{},{},{},{}",
            escape_csv(record.item_code().as_str()),
            optional_field(record.bad_qty()),
            optional_field(record.received_qty()),
            record.doc_date().format("%Y-%m-%d"),
            optional_field(record.defect_rate()),
        );
    }

    csv
}
