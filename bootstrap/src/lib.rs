//! qms-bootstrap - 统一服务启动骨架
//!
//! 配置加载、日志初始化、数据库连接和 HTTP 服务的启动逻辑

mod infrastructure;
mod runtime;
mod starter;

pub use infrastructure::*;
pub use runtime::*;
pub use starter::*;
