//! 领域层
//!
//! 检验记录、聚合视图、控制限计算和仓储接口

pub mod entities;
pub mod repositories;
pub mod services;
pub mod value_objects;
pub mod views;

pub use entities::*;
pub use repositories::*;
pub use services::*;
pub use value_objects::*;
pub use views::*;
