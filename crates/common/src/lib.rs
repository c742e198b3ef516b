//! qms-common - 通用类型和工具库

pub mod health;
pub mod retry;

pub use health::*;
pub use retry::*;
