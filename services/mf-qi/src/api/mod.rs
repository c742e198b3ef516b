//! HTTP API 层

pub mod charts;
pub mod dashboard;
mod handlers;
mod routes;

pub use dashboard::{DashboardPage, DashboardParams};
pub use routes::{AppState, router};
