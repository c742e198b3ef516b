//! 单据日期（DOC_DT）解析

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentDateError {
    #[error("document date {0:?} is not in YYYYMMDD form")]
    Format(String),

    #[error("document date {0:?} is not a valid calendar date")]
    Calendar(String),
}

/// 解析 `YYYYMMDD` 格式的单据日期
///
/// 必须恰好 8 位数字，前后空白会被忽略
pub fn parse_document_date(raw: &str) -> Result<NaiveDate, DocumentDateError> {
    let trimmed = raw.trim();
    if trimmed.len() != 8 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DocumentDateError::Format(raw.to_string()));
    }

    NaiveDate::parse_from_str(trimmed, "%Y%m%d")
        .map_err(|_| DocumentDateError::Calendar(raw.to_string()))
}
