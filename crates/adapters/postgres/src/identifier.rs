//! SQL 标识符校验
//!
//! 表名来自配置，无法作为绑定参数传入，拼接进 SQL 前必须校验

use qms_errors::{AppError, AppResult};

const MAX_IDENTIFIER_LEN: usize = 63;

/// 校验 `table` 或 `schema.table` 形式的表名
///
/// 每一段必须以字母或下划线开头，只能包含 ASCII 字母、数字和下划线
pub fn validate_table_name(name: &str) -> AppResult<&str> {
    let parts: Vec<&str> = name.split('.').collect();
    if parts.len() > 2 {
        return Err(AppError::validation(format!(
            "Table name {:?} has too many qualifiers",
            name
        )));
    }

    for part in &parts {
        if !is_plain_identifier(part) {
            return Err(AppError::validation(format!(
                "Table name {:?} is not a plain SQL identifier",
                name
            )));
        }
    }

    Ok(name)
}

fn is_plain_identifier(part: &str) -> bool {
    let mut chars = part.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    part.len() <= MAX_IDENTIFIER_LEN
        && (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
