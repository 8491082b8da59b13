//! Strata Core - data model for reversible schema migrations
//!
//! This crate provides the migration unit types, the ordered registry
//! they are loaded into, and target resolution against that registry.
//! The transactional walk itself lives in `strata-engine`.

pub mod error;
pub mod registry;
pub mod target;
pub mod unit;

pub use error::{Error, Result};
pub use registry::{Registry, UnitSource};
pub use target::Target;
pub use unit::{batch_op, Direction, MigrationOp, MigrationUnit, UnitCandidate};
