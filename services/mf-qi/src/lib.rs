//! mf-qi - 品质检验看板服务

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
