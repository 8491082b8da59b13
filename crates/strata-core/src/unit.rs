//! Migration unit types and operations

use std::fmt;

use rusqlite::Transaction;

/// A schema operation run inside the engine's transaction.
///
/// Operations return the store's own error type; the engine wraps a
/// failure in [`Error::Operation`](crate::Error::Operation) and rolls the
/// whole transaction back.
pub type MigrationOp = Box<dyn Fn(&Transaction<'_>) -> rusqlite::Result<()> + Send + Sync>;

/// Build an operation that runs a SQL batch. Most real migrations are
/// plain DDL, so this is the common constructor.
pub fn batch_op(sql: impl Into<String>) -> MigrationOp {
    let sql = sql.into();
    Box::new(move |tx| tx.execute_batch(&sql))
}

/// Which way a unit is being run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Forward => write!(f, "forward"),
            Direction::Backward => write!(f, "backward"),
        }
    }
}

/// A named, reversible schema transformation.
///
/// The name is the sole ordering key: lexical order equals chronological
/// order, so names carry a zero-padded prefix (`000-initial`,
/// `001-add-index`, ...). `backward` must be the exact inverse of
/// `forward`.
///
/// Units are immutable and owned by the [`Registry`](crate::Registry) for
/// the life of the process; the engine only reads them.
pub struct MigrationUnit {
    name: String,
    forward: MigrationOp,
    backward: MigrationOp,
}

impl MigrationUnit {
    pub fn new(name: impl Into<String>, forward: MigrationOp, backward: MigrationOp) -> Self {
        Self {
            name: name.into(),
            forward,
            backward,
        }
    }

    /// Unit whose forward and backward operations are SQL batches.
    pub fn from_sql(
        name: impl Into<String>,
        up_sql: impl Into<String>,
        down_sql: impl Into<String>,
    ) -> Self {
        Self::new(name, batch_op(up_sql), batch_op(down_sql))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Apply the unit's schema change. Must run at most once per name.
    pub fn forward(&self, tx: &Transaction<'_>) -> rusqlite::Result<()> {
        (self.forward)(tx)
    }

    /// Restore the schema to its pre-forward state.
    pub fn backward(&self, tx: &Transaction<'_>) -> rusqlite::Result<()> {
        (self.backward)(tx)
    }
}

impl fmt::Debug for MigrationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MigrationUnit")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A discovered unit before validation.
///
/// Loaders hand these to the registry as found; either operation may be
/// missing (the original module forgot an export, a `.up.sql` file has no
/// `.down.sql` twin). The registry skips incomplete candidates with a
/// warning rather than aborting discovery.
pub struct UnitCandidate {
    pub name: String,
    pub forward: Option<MigrationOp>,
    pub backward: Option<MigrationOp>,
}

impl UnitCandidate {
    /// Candidate with both operations present.
    pub fn new(name: impl Into<String>, forward: MigrationOp, backward: MigrationOp) -> Self {
        Self {
            name: name.into(),
            forward: Some(forward),
            backward: Some(backward),
        }
    }

    /// Complete candidate built from SQL batches.
    pub fn from_sql(
        name: impl Into<String>,
        up_sql: impl Into<String>,
        down_sql: impl Into<String>,
    ) -> Self {
        Self::new(name, batch_op(up_sql), batch_op(down_sql))
    }
}

impl fmt::Debug for UnitCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnitCandidate")
            .field("name", &self.name)
            .field("forward", &self.forward.is_some())
            .field("backward", &self.backward.is_some())
            .finish()
    }
}
