//! 数据库行到领域对象的转换

use crate::domain::entities::InspectionRecord;
use crate::domain::value_objects::{DocumentDateError, ItemCode, parse_document_date};

use super::rows::InspectionRow;

/// 一批行的转换结果
#[derive(Debug)]
pub struct ConvertedRows {
    pub records: Vec<InspectionRecord>,
    /// 因 `DOC_DT` 为空而跳过的行数
    pub skipped: usize,
}

/// 将 InspectionRow 转换为 InspectionRecord
///
/// - `DOC_DT` 为空的行无法归入任何期间，返回 `Ok(None)`
/// - 数量为空保留为缺失值，品目编码为空按空字符串处理
/// - `DOC_DT` 格式错误返回错误，由调用方中止加载
pub fn inspection_record_from_row(
    row: InspectionRow,
) -> Result<Option<InspectionRecord>, DocumentDateError> {
    let Some(raw_date) = row.doc_dt else {
        return Ok(None);
    };
    let doc_date = parse_document_date(&raw_date)?;

    Ok(Some(InspectionRecord::from_source(
        ItemCode::new(row.item_cd.unwrap_or_default()),
        row.qcbad_qt,
        row.qcrcv_qt,
        doc_date,
    )))
}

/// 按原顺序转换整批行，统计跳过的行数；遇到格式错误的日期立即返回
pub fn inspection_records_from_rows(
    rows: Vec<InspectionRow>,
) -> Result<ConvertedRows, DocumentDateError> {
    let mut records = Vec::with_capacity(rows.len());
    let mut skipped = 0;
    for row in rows {
        match inspection_record_from_row(row)? {
            Some(record) => records.push(record),
            None => skipped += 1,
        }
    }

    Ok(ConvertedRows { records, skipped })
}
