use std::fmt;

use sha2::{Digest, Sha256};

use crate::error::MigrationResult;

/// Anything that can run a batch of semicolon-separated SQL statements.
pub trait SqlExecutor {
    fn batch_execute(&mut self, sql: &str) -> MigrationResult<()>;
}

/// The table or column a migration brings into existence.
///
/// The runner checks for it before applying: if it is already there the
/// migration is recorded as adopted and its reverse step is never run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaObject {
    Table(&'static str),
    Column { table: &'static str, column: &'static str },
}

impl fmt::Display for SchemaObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table(table) => f.write_str(table),
            Self::Column { table, column } => write!(f, "{table}.{column}"),
        }
    }
}

/// A versioned schema change with a forward and a reverse operation.
///
/// Implementors only describe the SQL; `up` and `down` execute it and log
/// the outcome.
pub trait Migration: Send + Sync {
    fn version(&self) -> i64;

    fn name(&self) -> &'static str;

    fn up_sql(&self) -> &'static str;

    fn down_sql(&self) -> &'static str;

    fn creates(&self) -> SchemaObject;

    fn up(&self, db: &mut dyn SqlExecutor) -> MigrationResult<()> {
        match db.batch_execute(self.up_sql()) {
            Ok(()) => {
                tracing::info!(version = self.version(), name = self.name(), "applied migration");
                Ok(())
            }
            Err(e) => {
                tracing::error!(version = self.version(), name = self.name(), error = %e, "migration failed");
                Err(e)
            }
        }
    }

    fn down(&self, db: &mut dyn SqlExecutor) -> MigrationResult<()> {
        match db.batch_execute(self.down_sql()) {
            Ok(()) => {
                tracing::info!(version = self.version(), name = self.name(), "reverted migration");
                Ok(())
            }
            Err(e) => {
                tracing::error!(version = self.version(), name = self.name(), error = %e, "rollback failed");
                Err(e)
            }
        }
    }

    /// SHA-256 over both directions, hex encoded.
    fn checksum(&self) -> String {
        checksum(self.up_sql(), self.down_sql())
    }
}

pub fn checksum(up_sql: &str, down_sql: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(up_sql.as_bytes());
    // Separator so moving text between the two halves changes the digest.
    hasher.update([0u8]);
    hasher.update(down_sql.as_bytes());
    hex::encode(hasher.finalize())
}
