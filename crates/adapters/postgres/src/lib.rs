//! qms-adapter-postgres - PostgreSQL 适配器

mod connection;
mod identifier;

pub use connection::*;
pub use identifier::*;
