//! 值对象

mod document_date;
mod item_code;

pub use document_date::{DocumentDateError, parse_document_date};
pub use item_code::ItemCode;
