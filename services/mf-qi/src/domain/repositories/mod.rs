//! 仓储接口

mod inspection_repository;

pub use inspection_repository::InspectionRepository;
