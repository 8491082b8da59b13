//! The ordered, load-once catalogue of known migration units

use crate::error::{Error, Result};
use crate::unit::{MigrationUnit, UnitCandidate};

/// Source of unit candidates.
///
/// Discovery mechanics (directory walking, embedded lists) live behind
/// this seam; the registry and engine depend only on the sequence it
/// produces. `discover` is called exactly once, on the first
/// [`Registry::load`].
pub trait UnitSource {
    fn discover(&mut self) -> Result<Vec<UnitCandidate>>;
}

/// An already-materialized candidate list is itself a source.
impl UnitSource for Vec<UnitCandidate> {
    fn discover(&mut self) -> Result<Vec<UnitCandidate>> {
        Ok(std::mem::take(self))
    }
}

enum State {
    Unloaded(Box<dyn UnitSource + Send>),
    Loaded(Vec<MigrationUnit>),
    /// Discovery found two candidates with this name. The failure is
    /// sticky: retrying `load()` keeps reporting it instead of quietly
    /// loading whatever a re-drained source yields.
    Failed(String),
}

/// The in-memory, ordered catalogue of all known migration units.
///
/// Lifecycle is an explicit two-phase `Unloaded -> Loaded`: the first
/// [`load`](Registry::load) discovers, validates, and sorts candidates;
/// later calls are no-ops. Units are sorted ascending by name, so index 0
/// is the chronologically earliest migration.
///
/// Accessors other than [`is_loaded`](Registry::is_loaded) panic if
/// called before `load`; that is a programming error, not a runtime
/// condition. Every engine entry point loads first.
pub struct Registry {
    state: State,
}

impl Registry {
    pub fn new(source: impl UnitSource + Send + 'static) -> Self {
        Self {
            state: State::Unloaded(Box::new(source)),
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, State::Loaded(_))
    }

    /// Discover, validate, and sort units. Idempotent: once loaded, the
    /// source is gone and the unit set is fixed for the life of the
    /// registry.
    ///
    /// A candidate missing either operation is skipped with a warning;
    /// two candidates claiming the same name are a fatal configuration
    /// error, since which of them ordering should prefer is undefined.
    pub fn load(&mut self) -> Result<()> {
        let source = match &mut self.state {
            State::Loaded(_) => return Ok(()),
            State::Failed(name) => return Err(Error::DuplicateName(name.clone())),
            State::Unloaded(source) => source,
        };

        let candidates = source.discover()?;
        let mut units = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            match (candidate.forward, candidate.backward) {
                (Some(forward), Some(backward)) => {
                    units.push(MigrationUnit::new(candidate.name, forward, backward));
                }
                (forward, backward) => {
                    tracing::warn!(
                        name = %candidate.name,
                        has_forward = forward.is_some(),
                        has_backward = backward.is_some(),
                        "skipping migration candidate with a missing operation"
                    );
                }
            }
        }

        units.sort_by(|a, b| a.name().cmp(b.name()));
        for pair in units.windows(2) {
            if pair[0].name() == pair[1].name() {
                let name = pair[0].name().to_string();
                self.state = State::Failed(name.clone());
                return Err(Error::DuplicateName(name));
            }
        }

        tracing::debug!(count = units.len(), "migration registry loaded");
        self.state = State::Loaded(units);
        Ok(())
    }

    fn units(&self) -> &[MigrationUnit] {
        match &self.state {
            State::Loaded(units) => units,
            _ => panic!("registry accessed before load()"),
        }
    }

    pub fn len(&self) -> usize {
        self.units().len()
    }

    pub fn is_empty(&self) -> bool {
        self.units().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&MigrationUnit> {
        self.units().get(index)
    }

    /// Unit at a 0-based position.
    ///
    /// # Panics
    /// If `index` is out of range. Callers resolve indices through
    /// [`Target`](crate::Target), so a bad index is a programming error.
    pub fn unit_at(&self, index: usize) -> &MigrationUnit {
        match self.units().get(index) {
            Some(unit) => unit,
            None => panic!("registry index {index} out of range"),
        }
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.units().iter().position(|unit| unit.name() == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.units().iter().map(MigrationUnit::name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::batch_op;

    fn noop_candidate(name: &str) -> UnitCandidate {
        UnitCandidate::new(name, Box::new(|_| Ok(())), Box::new(|_| Ok(())))
    }

    #[test]
    fn load_sorts_ascending_by_name() {
        let mut registry = Registry::new(vec![
            noop_candidate("2-c"),
            noop_candidate("0-a"),
            noop_candidate("1-b"),
        ]);
        registry.load().unwrap();

        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, ["0-a", "1-b", "2-c"]);
        assert_eq!(registry.index_of("1-b"), Some(1));
        assert_eq!(registry.index_of("missing"), None);
    }

    #[test]
    fn incomplete_candidates_are_skipped() {
        let half = UnitCandidate {
            name: "1-no-down".into(),
            forward: Some(batch_op("SELECT 1;")),
            backward: None,
        };
        let mut registry = Registry::new(vec![noop_candidate("0-a"), half]);
        registry.load().unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.unit_at(0).name(), "0-a");
    }

    #[test]
    fn duplicate_names_are_fatal() {
        let mut registry = Registry::new(vec![noop_candidate("0-a"), noop_candidate("0-a")]);
        let err = registry.load().unwrap_err();
        assert!(matches!(err, Error::DuplicateName(name) if name == "0-a"));
        assert!(!registry.is_loaded());
    }

    #[test]
    fn duplicate_name_failure_is_sticky() {
        let mut registry = Registry::new(vec![noop_candidate("0-a"), noop_candidate("0-a")]);
        registry.load().unwrap_err();

        // The drained source must not turn a retry into an empty,
        // happily-loaded registry.
        let err = registry.load().unwrap_err();
        assert!(matches!(err, Error::DuplicateName(name) if name == "0-a"));
        assert!(!registry.is_loaded());
    }

    #[test]
    fn load_is_idempotent() {
        let mut registry = Registry::new(vec![noop_candidate("0-a")]);
        assert!(!registry.is_loaded());

        registry.load().unwrap();
        assert!(registry.is_loaded());
        assert_eq!(registry.len(), 1);

        // Second load must not re-discover or change anything.
        registry.load().unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    #[should_panic(expected = "before load")]
    fn access_before_load_panics() {
        let registry = Registry::new(Vec::<UnitCandidate>::new());
        let _ = registry.len();
    }
}
