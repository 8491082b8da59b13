//! SQL-file migration loader
//!
//! The discovery collaborator the engine stays ignorant of: scans one
//! directory level for `NAME.up.sql` / `NAME.down.sql` pairs and hands
//! the registry unit candidates. A name with only one of the two files
//! yields an incomplete candidate, which the registry warns about and
//! skips.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use strata_core::{batch_op, Result, UnitCandidate, UnitSource};

pub struct SqlDirSource {
    dir: PathBuf,
}

impl SqlDirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl UnitSource for SqlDirSource {
    fn discover(&mut self) -> Result<Vec<UnitCandidate>> {
        // name -> (up sql, down sql)
        let mut halves: BTreeMap<String, (Option<String>, Option<String>)> = BTreeMap::new();

        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };

            if let Some(name) = file_name.strip_suffix(".up.sql") {
                halves.entry(name.to_string()).or_default().0 = Some(fs::read_to_string(&path)?);
            } else if let Some(name) = file_name.strip_suffix(".down.sql") {
                halves.entry(name.to_string()).or_default().1 = Some(fs::read_to_string(&path)?);
            } else {
                tracing::debug!(file = %path.display(), "ignoring non-migration file");
            }
        }

        Ok(halves
            .into_iter()
            .map(|(name, (up, down))| UnitCandidate {
                name,
                forward: up.map(batch_op),
                backward: down.map(batch_op),
            })
            .collect())
    }
}
