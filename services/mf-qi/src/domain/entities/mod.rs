//! 实体

mod inspection_record;

pub use inspection_record::{DEFECT_RATE_EPSILON, InspectionRecord, defect_rate};
