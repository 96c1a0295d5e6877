use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::sql_types::{Bool, Text};

use crate::error::{MigrationError, MigrationResult};
use crate::migration::{SchemaObject, SqlExecutor};
use crate::models::{AppliedMigration, NewAppliedMigration};
use crate::schema::schema_migrations;

pub const LEDGER_TABLE: &str = "schema_migrations";

const LEDGER_SQL: &str = "
CREATE TABLE IF NOT EXISTS schema_migrations (
    version     BIGINT PRIMARY KEY,
    name        VARCHAR(255) NOT NULL,
    checksum    VARCHAR(64) NOT NULL,
    applied_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    adopted     BOOLEAN NOT NULL DEFAULT FALSE
);
ALTER TABLE schema_migrations ADD COLUMN IF NOT EXISTS adopted BOOLEAN NOT NULL DEFAULT FALSE;
";

#[derive(QueryableByName)]
struct Exists {
    #[diesel(sql_type = Bool)]
    present: bool,
}

/// Database handle as seen by the [`Migrator`](crate::Migrator): raw SQL
/// execution plus bookkeeping in the `schema_migrations` ledger.
pub trait MigrationStore {
    fn executor(&mut self) -> &mut dyn SqlExecutor;

    /// Whether `object` exists in the current schema. Read-only.
    fn object_exists(&mut self, object: &SchemaObject) -> MigrationResult<bool>;

    /// Create the ledger table if it does not exist yet.
    fn ensure_ledger(&mut self) -> MigrationResult<()>;

    fn ledger_exists(&mut self) -> MigrationResult<bool> {
        self.object_exists(&SchemaObject::Table(LEDGER_TABLE))
    }

    /// Ledger rows in ascending version order.
    fn applied(&mut self) -> MigrationResult<Vec<AppliedMigration>>;

    fn record_applied(&mut self, entry: NewAppliedMigration<'_>) -> MigrationResult<()>;

    fn remove_applied(&mut self, version: i64) -> MigrationResult<()>;

    /// Run `f` atomically; any error rolls back everything it did.
    fn in_transaction(
        &mut self,
        f: &mut dyn FnMut(&mut dyn MigrationStore) -> MigrationResult<()>,
    ) -> MigrationResult<()>;
}

impl SqlExecutor for PgConnection {
    fn batch_execute(&mut self, sql: &str) -> MigrationResult<()> {
        SimpleConnection::batch_execute(self, sql)?;
        Ok(())
    }
}

impl MigrationStore for PgConnection {
    fn executor(&mut self) -> &mut dyn SqlExecutor {
        self
    }

    fn object_exists(&mut self, object: &SchemaObject) -> MigrationResult<bool> {
        let row = match *object {
            SchemaObject::Table(table) => diesel::sql_query(
                "SELECT EXISTS (SELECT 1 FROM information_schema.tables \
                 WHERE table_schema = current_schema() AND table_name = $1) AS present",
            )
            .bind::<Text, _>(table)
            .get_result::<Exists>(self)?,
            SchemaObject::Column { table, column } => diesel::sql_query(
                "SELECT EXISTS (SELECT 1 FROM information_schema.columns \
                 WHERE table_schema = current_schema() AND table_name = $1 \
                 AND column_name = $2) AS present",
            )
            .bind::<Text, _>(table)
            .bind::<Text, _>(column)
            .get_result::<Exists>(self)?,
        };
        Ok(row.present)
    }

    fn ensure_ledger(&mut self) -> MigrationResult<()> {
        SimpleConnection::batch_execute(self, LEDGER_SQL)?;
        Ok(())
    }

    fn applied(&mut self) -> MigrationResult<Vec<AppliedMigration>> {
        let rows = schema_migrations::table
            .order(schema_migrations::version.asc())
            .load::<AppliedMigration>(self)?;
        Ok(rows)
    }

    fn record_applied(&mut self, entry: NewAppliedMigration<'_>) -> MigrationResult<()> {
        diesel::insert_into(schema_migrations::table)
            .values(&entry)
            .execute(self)?;
        Ok(())
    }

    fn remove_applied(&mut self, version: i64) -> MigrationResult<()> {
        diesel::delete(schema_migrations::table.filter(schema_migrations::version.eq(version)))
            .execute(self)?;
        Ok(())
    }

    fn in_transaction(
        &mut self,
        f: &mut dyn FnMut(&mut dyn MigrationStore) -> MigrationResult<()>,
    ) -> MigrationResult<()> {
        self.transaction::<(), MigrationError, _>(|conn| f(conn))
    }
}
