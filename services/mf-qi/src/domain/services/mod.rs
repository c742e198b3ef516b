//! 领域服务

mod aggregation;
mod control_limits;

pub use aggregation::*;
pub use control_limits::*;
