//! Strata Engine - drives a SQLite store's schema to a target migration
//!
//! The engine moves a persistent ledger of applied migrations toward a
//! target registry position, one atomic transaction per call. The ledger
//! is validated against the registry before anything is mutated, so the
//! store's recorded history can never silently diverge from the set of
//! migrations the program knows about.

pub mod engine;
pub mod ledger;

pub use engine::{initialize, open_database, Migrator};
pub use ledger::LedgerRow;
