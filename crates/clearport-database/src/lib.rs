//! PostgreSQL persistence layer: connection pool, migrations, and
//! hand-written-SQL repositories.

pub mod connection;
pub mod repositories;
