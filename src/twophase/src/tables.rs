use crate::{
    coords::MoveTables,
    pruning::{PruningTables, TableBuildError},
    start, success,
};
use log::info;
use std::{sync::OnceLock, time::Instant};

/// Every precomputed table the solver reads. Immutable once built, so one
/// instance can be shared by any number of concurrent solves.
pub struct Tables {
    moves: MoveTables,
    pruning: PruningTables,
}

static SHARED: OnceLock<Result<Tables, TableBuildError>> = OnceLock::new();

impl Tables {
    /// Build the move tables, then the pruning tables from them.
    ///
    /// # Errors
    ///
    /// If a pruning table fails its completeness check.
    pub fn build() -> Result<Self, TableBuildError> {
        info!(start!("Generating move tables"));
        let start = Instant::now();
        let moves = MoveTables::generate();
        info!(
            success!("Move tables generated in {:.3}s"),
            start.elapsed().as_secs_f64()
        );
        let pruning = PruningTables::generate(&moves)?;
        Ok(Self { moves, pruning })
    }

    /// The process-wide tables, built on first use. Later callers block until
    /// the first build has finished and then see the same result.
    ///
    /// # Errors
    ///
    /// If the build failed. The failure is remembered.
    pub fn shared() -> Result<&'static Self, TableBuildError> {
        SHARED.get_or_init(Self::build).as_ref().map_err(Clone::clone)
    }

    #[must_use]
    pub fn moves(&self) -> &MoveTables {
        &self.moves
    }

    #[must_use]
    pub fn pruning(&self) -> &PruningTables {
        &self.pruning
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn test_shared_is_built_once() {
        let a = Tables::shared().unwrap();
        let b = std::thread::spawn(|| Tables::shared().unwrap())
            .join()
            .unwrap();
        assert!(std::ptr::eq(a, b));
    }
}
