//! 检验记录仓储接口

use async_trait::async_trait;
use qms_errors::AppResult;

use crate::domain::entities::InspectionRecord;

/// 检验记录仓储接口（只读）
#[async_trait]
pub trait InspectionRepository: Send + Sync {
    /// 读取全部检验记录，保持来源顺序
    async fn fetch_all(&self) -> AppResult<Vec<InspectionRecord>>;

    /// 检查数据源是否可达
    async fn ping(&self) -> AppResult<()>;
}
