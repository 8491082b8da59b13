//! Target resolution: which registry position the ledger should match

use crate::error::{Error, Result};
use crate::registry::Registry;

/// The registry position a migration run should drive the store to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// The last unit in the registry.
    Latest,
    /// Before the first unit: everything undone.
    Nothing,
    /// The unit with this exact name.
    Named(String),
}

impl Target {
    /// Parse a target spelling: `latest`, `nothing`, or a unit name.
    pub fn parse(spec: &str) -> Self {
        match spec {
            "latest" => Target::Latest,
            "nothing" => Target::Nothing,
            name => Target::Named(name.to_string()),
        }
    }

    /// Resolve to a registry index. `Nothing` is the virtual index `-1`.
    ///
    /// The registry must already be loaded; the engine guarantees that.
    pub fn resolve(&self, registry: &Registry) -> Result<i64> {
        match self {
            Target::Latest => Ok(registry.len() as i64 - 1),
            Target::Nothing => Ok(-1),
            Target::Named(name) => registry
                .index_of(name)
                .map(|index| index as i64)
                .ok_or_else(|| Error::TargetNotFound(name.clone())),
        }
    }
}
