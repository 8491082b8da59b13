//! Error types for Strata

use crate::unit::Direction;
use thiserror::Error;

/// Result type alias using Strata's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Strata error types
#[derive(Error, Debug)]
pub enum Error {
    /// A named target was requested that no registered migration carries.
    /// Recoverable; nothing has been mutated.
    #[error("Target migration not found: {0}")]
    TargetNotFound(String),

    /// The ledger's recorded history is not a prefix of the registry.
    /// The store was migrated by a different set of migrations than the
    /// one currently loaded (a unit was renamed, removed, or reordered
    /// after being applied).
    #[error(
        "History diverges from the registry at position {position}: \
         ledger recorded {expected:?}, registry defines {}",
        .actual.as_deref().unwrap_or("nothing")
    )]
    HistoryDivergence {
        position: usize,
        /// Name recorded in the ledger at this position.
        expected: String,
        /// Name the registry defines at this position, if any.
        actual: Option<String>,
    },

    /// Two discovered candidates claim the same name. Which of them the
    /// ordering should prefer is undefined, so discovery aborts.
    #[error("Duplicate migration name: {0}")]
    DuplicateName(String),

    /// A unit's forward or backward operation failed mid-walk. The
    /// surrounding transaction has been rolled back.
    #[error("Migration {name:?} failed while running {direction}")]
    Operation {
        name: String,
        direction: Direction,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn divergence_display_names_both_sides() {
        let e = Error::HistoryDivergence {
            position: 2,
            expected: "2-old".into(),
            actual: Some("2-new".into()),
        };
        let message = e.to_string();
        assert!(message.contains("position 2"));
        assert!(message.contains("2-old"));
        assert!(message.contains("2-new"));

        let e = Error::HistoryDivergence {
            position: 4,
            expected: "4-extra".into(),
            actual: None,
        };
        assert!(e.to_string().contains("registry defines nothing"));
    }

    #[test]
    fn operation_error_keeps_the_source() {
        use std::error::Error as _;

        let e = Error::Operation {
            name: "0-initial".into(),
            direction: Direction::Forward,
            source: rusqlite::Error::InvalidQuery,
        };
        assert!(e.to_string().contains("forward"));
        assert!(e.source().is_some());
    }
}
