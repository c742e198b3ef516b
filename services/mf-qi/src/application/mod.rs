//! Application layer

pub mod csv_export;
pub mod dataset;
pub mod handler;
pub mod queries;

pub use dataset::{DatasetCache, InspectionDataset};
pub use handler::ServiceHandler;
pub use queries::*;
