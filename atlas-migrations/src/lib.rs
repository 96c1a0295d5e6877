//! Versioned schema migrations for the Atlas database.
//!
//! Every migration pairs a forward SQL file from `sql/` with a fixed teardown
//! statement. [`Migrator`] applies them in ascending version order and records
//! each one in the `schema_migrations` ledger.

pub mod config;
pub mod error;
pub mod migration;
pub mod migrations;
pub mod models;
pub mod runner;
pub mod schema;
pub mod store;

pub use error::{MigrationError, MigrationResult};
pub use migration::{Migration, SchemaObject, SqlExecutor};
pub use runner::{MigrationState, MigrationStatus, Migrator};
pub use store::MigrationStore;
