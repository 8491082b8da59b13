//! The migration engine: one atomic transaction per walk

use std::path::Path;

use rusqlite::Connection;
use strata_core::{Direction, Error, Registry, Result, Target, UnitSource};

use crate::ledger::{self, LedgerRow};

/// Drives the ledger toward a target registry position.
///
/// An explicit value over a borrowed connection, not a process-wide
/// singleton. The caller controls both lifetimes and must ensure at most
/// one migrator drives a given store at a time (typically once at
/// startup, before anything else touches the database).
///
/// Every public entry point loads the registry, opens one transaction,
/// validates the ledger against the registry, and walks forward or
/// backward to the target. Either every step commits or none do.
pub struct Migrator<'conn> {
    conn: &'conn mut Connection,
    registry: Registry,
}

impl<'conn> Migrator<'conn> {
    /// Construct the engine and bootstrap the ledger table. The
    /// bootstrap is create-if-absent and happens before any walk.
    pub fn new(conn: &'conn mut Connection, registry: Registry) -> Result<Self> {
        ledger::bootstrap(conn)?;
        Ok(Self { conn, registry })
    }

    /// Apply every pending unit, oldest first.
    pub fn migrate_to_latest(&mut self) -> Result<()> {
        self.migrate(&Target::Latest)
    }

    /// Undo every applied unit, most recent first.
    pub fn migrate_to_nothing(&mut self) -> Result<()> {
        self.migrate(&Target::Nothing)
    }

    /// Move to the named unit, in whichever direction that lies.
    pub fn migrate_to(&mut self, name: &str) -> Result<()> {
        self.migrate(&Target::Named(name.to_string()))
    }

    pub fn migrate(&mut self, target: &Target) -> Result<()> {
        self.registry.load()?;
        let target_index = target.resolve(&self.registry)?;
        self.move_to(target_index)
    }

    /// Current ledger rows, in application order.
    pub fn applied(&self) -> Result<Vec<LedgerRow>> {
        Ok(ledger::rows(&*self.conn)?)
    }

    /// Names of every registered unit, in registry order.
    pub fn unit_names(&mut self) -> Result<Vec<String>> {
        self.registry.load()?;
        Ok(self.registry.names().map(str::to_string).collect())
    }

    fn move_to(&mut self, target_index: i64) -> Result<()> {
        let unit_count = self.registry.len() as i64;
        // Out-of-range targets are a programming error, not a user
        // input: names resolve through Target, indexes come from the
        // registry itself.
        assert!(
            (-1..unit_count).contains(&target_index),
            "target index {target_index} outside -1..{unit_count}"
        );

        let tx = self.conn.transaction()?;

        // The ledger must be a prefix of the registry, position for
        // position, before anything moves.
        let applied = ledger::rows(&tx)?;
        for (position, row) in applied.iter().enumerate() {
            let actual = self.registry.get(position).map(|unit| unit.name());
            if actual != Some(row.name.as_str()) {
                return Err(Error::HistoryDivergence {
                    position,
                    expected: row.name.clone(),
                    actual: actual.map(str::to_string),
                });
            }
        }

        let current_index = applied.len() as i64 - 1;
        if current_index == target_index {
            tx.commit()?;
            return Ok(());
        }

        if current_index > target_index {
            // Undo most-recent-first.
            for index in ((target_index + 1)..=current_index).rev() {
                let unit = self.registry.unit_at(index as usize);
                unit.backward(&tx).map_err(|source| Error::Operation {
                    name: unit.name().to_string(),
                    direction: Direction::Backward,
                    source,
                })?;
                ledger::erase(&tx, unit.name())?;
                tracing::info!(name = unit.name(), "migrated backward");
            }
        } else {
            // Apply oldest-pending-first.
            for index in (current_index + 1)..=target_index {
                let unit = self.registry.unit_at(index as usize);
                unit.forward(&tx).map_err(|source| Error::Operation {
                    name: unit.name().to_string(),
                    direction: Direction::Forward,
                    source,
                })?;
                ledger::record(&tx, unit.name())?;
                tracing::info!(name = unit.name(), "migrated forward");
            }
        }

        tx.commit()?;
        Ok(())
    }
}

/// Open (or create) a database with the standard pragmas applied.
pub fn open_database(path: impl AsRef<Path>) -> Result<Connection> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "opening database");

    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

/// Open a database and drive it to the latest migration in one step.
/// The usual startup call: everything after it sees the final schema.
pub fn initialize(
    path: impl AsRef<Path>,
    source: impl UnitSource + Send + 'static,
) -> Result<Connection> {
    let mut conn = open_database(path)?;
    let mut migrator = Migrator::new(&mut conn, Registry::new(source))?;
    migrator.migrate_to_latest()?;
    drop(migrator);
    Ok(conn)
}
