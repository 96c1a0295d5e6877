use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use metrics::counter;
use serde::Serialize;

use crate::error::{MigrationError, MigrationResult};
use crate::migration::Migration;
use crate::migrations;
use crate::models::{AppliedMigration, NewAppliedMigration};
use crate::store::MigrationStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationState {
    Pending,
    Applied,
    /// Applied, but the SQL in this build no longer matches what ran.
    Drifted,
    /// Present in the ledger but not compiled into this build.
    Unknown,
}

#[derive(Debug, Clone, Serialize)]
pub struct MigrationStatus {
    pub version: i64,
    pub name: String,
    pub state: MigrationState,
    pub applied_at: Option<DateTime<Utc>>,
    pub adopted: bool,
}

/// Applies and reverts an ordered set of migrations against a
/// [`MigrationStore`]. Each migration and its ledger row commit together.
pub struct Migrator {
    migrations: Vec<Box<dyn Migration>>,
}

impl Migrator {
    pub fn new(mut migrations: Vec<Box<dyn Migration>>) -> MigrationResult<Self> {
        migrations.sort_by_key(|m| m.version());
        if let Some(pair) = migrations.windows(2).find(|w| w[0].version() == w[1].version()) {
            return Err(MigrationError::DuplicateVersion(pair[0].version()));
        }
        Ok(Self { migrations })
    }

    /// The migrations compiled into this crate.
    pub fn bundled() -> MigrationResult<Self> {
        Self::new(migrations::all())
    }

    pub fn migrations(&self) -> impl Iterator<Item = &dyn Migration> {
        self.migrations.iter().map(|m| &**m)
    }

    fn find(&self, version: i64) -> Option<&dyn Migration> {
        self.migrations
            .binary_search_by_key(&version, |m| m.version())
            .ok()
            .map(|i| &*self.migrations[i])
    }

    /// Read-only; a database without a ledger reports everything pending.
    pub fn status(&self, store: &mut dyn MigrationStore) -> MigrationResult<Vec<MigrationStatus>> {
        let applied = read_ledger(store)?;
        let by_version: HashMap<i64, &AppliedMigration> =
            applied.iter().map(|a| (a.version, a)).collect();

        let mut statuses: Vec<MigrationStatus> = self
            .migrations
            .iter()
            .map(|m| {
                let entry = by_version.get(&m.version());
                let state = match entry {
                    Some(a) if a.checksum == m.checksum() => MigrationState::Applied,
                    Some(_) => MigrationState::Drifted,
                    None => MigrationState::Pending,
                };
                MigrationStatus {
                    version: m.version(),
                    name: m.name().to_string(),
                    state,
                    applied_at: entry.map(|a| a.applied_at),
                    adopted: entry.is_some_and(|a| a.adopted),
                }
            })
            .collect();

        statuses.extend(applied.iter().filter(|a| self.find(a.version).is_none()).map(|a| {
            MigrationStatus {
                version: a.version,
                name: a.name.clone(),
                state: MigrationState::Unknown,
                applied_at: Some(a.applied_at),
                adopted: a.adopted,
            }
        }));
        statuses.sort_by_key(|s| s.version);
        Ok(statuses)
    }

    /// Read-only, like [`status`](Self::status).
    pub fn pending(&self, store: &mut dyn MigrationStore) -> MigrationResult<Vec<&dyn Migration>> {
        let applied: HashSet<i64> = read_ledger(store)?.iter().map(|a| a.version).collect();
        Ok(self
            .migrations()
            .filter(|m| !applied.contains(&m.version()))
            .collect())
    }

    /// Versions of applied migrations whose checksum no longer matches.
    pub fn verify(&self, store: &mut dyn MigrationStore) -> MigrationResult<Vec<i64>> {
        let applied = read_ledger(store)?;
        Ok(self.drifted(&applied))
    }

    fn drifted(&self, applied: &[AppliedMigration]) -> Vec<i64> {
        applied
            .iter()
            .filter_map(|a| {
                let m = self.find(a.version)?;
                (m.checksum() != a.checksum).then_some(a.version)
            })
            .collect()
    }

    /// Apply every pending migration in ascending order, stopping at the first
    /// failure. Returns the versions that were applied.
    pub fn run_pending(&self, store: &mut dyn MigrationStore) -> MigrationResult<Vec<i64>> {
        store.ensure_ledger()?;
        let applied = store.applied()?;

        let drifted = self.drifted(&applied);
        if !drifted.is_empty() {
            tracing::error!(versions = ?drifted, "refusing to migrate: applied migrations changed");
            return Err(MigrationError::ChecksumMismatch { versions: drifted });
        }

        let applied: HashSet<i64> = applied.iter().map(|a| a.version).collect();
        let mut done = Vec::new();
        for m in self.migrations().filter(|m| !applied.contains(&m.version())) {
            apply(store, m)?;
            done.push(m.version());
        }

        if done.is_empty() {
            tracing::info!("schema is up to date");
        } else {
            tracing::info!(count = done.len(), "migrations applied");
        }
        Ok(done)
    }

    /// Revert the newest `steps` applied migrations, newest first.
    pub fn revert(&self, store: &mut dyn MigrationStore, steps: usize) -> MigrationResult<Vec<i64>> {
        store.ensure_ledger()?;
        let applied = store.applied()?;
        if applied.is_empty() {
            return Err(MigrationError::NothingToRevert);
        }

        let mut done = Vec::new();
        for entry in applied.iter().rev().take(steps) {
            let m = self
                .find(entry.version)
                .ok_or(MigrationError::UnknownVersion(entry.version))?;
            revert(store, m, entry.adopted)?;
            done.push(m.version());
        }
        Ok(done)
    }

    /// Revert the newest applied migration and apply it again, both in one
    /// transaction, so a failed re-apply leaves it applied as before.
    pub fn redo(&self, store: &mut dyn MigrationStore) -> MigrationResult<i64> {
        store.ensure_ledger()?;
        let last = store
            .applied()?
            .pop()
            .ok_or(MigrationError::NothingToRevert)?;
        let m = self
            .find(last.version)
            .ok_or(MigrationError::UnknownVersion(last.version))?;

        let checksum = m.checksum();
        store.in_transaction(&mut |tx: &mut dyn MigrationStore| {
            revert_step(tx, m, last.adopted)?;
            apply_step(tx, m, &checksum)
        })?;
        counter!("migrations_reverted_total").increment(1);
        counter!("migrations_applied_total").increment(1);
        Ok(m.version())
    }
}

/// Ledger rows without creating the ledger; missing means nothing applied.
fn read_ledger(store: &mut dyn MigrationStore) -> MigrationResult<Vec<AppliedMigration>> {
    if !store.ledger_exists()? {
        return Ok(Vec::new());
    }
    store.applied()
}

fn apply(store: &mut dyn MigrationStore, m: &dyn Migration) -> MigrationResult<()> {
    let checksum = m.checksum();
    store.in_transaction(&mut |tx: &mut dyn MigrationStore| apply_step(tx, m, &checksum))?;
    counter!("migrations_applied_total").increment(1);
    Ok(())
}

fn revert(store: &mut dyn MigrationStore, m: &dyn Migration, adopted: bool) -> MigrationResult<()> {
    store.in_transaction(&mut |tx: &mut dyn MigrationStore| revert_step(tx, m, adopted))?;
    counter!("migrations_reverted_total").increment(1);
    Ok(())
}

/// Runs `up` and records it, unless the object is already present, in which
/// case the migration is only recorded as adopted.
fn apply_step(tx: &mut dyn MigrationStore, m: &dyn Migration, checksum: &str) -> MigrationResult<()> {
    let object = m.creates();
    let adopted = tx.object_exists(&object)?;
    if adopted {
        tracing::info!(
            version = m.version(),
            name = m.name(),
            object = %object,
            "object already exists, adopting migration"
        );
    } else {
        m.up(tx.executor())?;
    }
    tx.record_applied(NewAppliedMigration {
        version: m.version(),
        name: m.name(),
        checksum,
        adopted,
    })
}

/// Adopted migrations never created their object, so `down` is skipped.
fn revert_step(tx: &mut dyn MigrationStore, m: &dyn Migration, adopted: bool) -> MigrationResult<()> {
    if adopted {
        tracing::info!(
            version = m.version(),
            name = m.name(),
            object = %m.creates(),
            "leaving adopted object in place"
        );
    } else {
        m.down(tx.executor())?;
    }
    tx.remove_applied(m.version())
}
