//! 数据库行映射结构

use sqlx::FromRow;

/// 检验记录数据库行
///
/// 来源表允许空值，这里全部按可空读取，由转换层决定如何处理
#[derive(Debug, Clone, FromRow)]
pub struct InspectionRow {
    pub item_cd: Option<String>,
    pub qcbad_qt: Option<f64>,
    pub qcrcv_qt: Option<f64>,
    pub doc_dt: Option<String>,
}
