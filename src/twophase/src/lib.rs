//! A two-phase solver for the 3x3x3 cube.
//!
//! Phase 1 searches for a move sequence that brings the cube into the
//! subgroup generated by `U, D, R2, L2, F2, B2`; phase 2 solves the cube
//! within that subgroup. The search keeps looking for shorter solutions
//! until it either proves the best one optimal or runs out of time.
//!
//! ```no_run
//! let solution = twophase::solve(
//!     "DUUBULDBFRBFRRULLLBRDFFFBLURDBFDFDRFRULBLUFDURRBLBDUDL",
//!     0,
//!     5.0,
//! )?;
//! println!("{solution}");
//! # Ok::<(), twophase::SolveError>(())
//! ```

#![warn(clippy::pedantic)]
#![allow(
    clippy::similar_names,
    clippy::too_many_lines,
    clippy::cast_possible_truncation
)]

pub mod coords;
pub mod cubie;
pub mod facelet;
pub mod moves;
pub mod pruning;
pub mod solver;
pub mod tables;

use std::time::Duration;
use thiserror::Error;

pub use cubie::{CubieCube, InvalidStateError};
pub use facelet::FaceletCube;
pub use moves::{Face, Move, MoveIndexError, ParseMoveError};
pub use pruning::TableBuildError;
pub use solver::{InvalidStartPhaseError, Solution, SolverError, StartPhase, TwoPhaseSolver};
pub use tables::Tables;

#[macro_export]
macro_rules! start {
    ($msg:expr) => {
        concat!("⏳ ", $msg)
    };
}

#[macro_export]
macro_rules! working {
    ($msg:expr) => {
        concat!("🛠  ", $msg)
    };
}

#[macro_export]
macro_rules! success {
    ($msg:expr) => {
        concat!("✅ ", $msg)
    };
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    #[error("Invalid cube: {0}")]
    InvalidState(#[from] InvalidStateError),
    #[error(transparent)]
    InvalidStartPhase(#[from] InvalidStartPhaseError),
    #[error("Invalid time limit {0}, expected a positive number of seconds")]
    InvalidTimeLimit(f64),
    #[error("Could not build the tables: {0}")]
    Table(#[from] TableBuildError),
    #[error(transparent)]
    Solver(#[from] SolverError),
}

impl SolveError {
    /// Whether the search ran out of time before finding any solution.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, SolveError::Solver(SolverError::SearchTimeout { .. }))
    }
}

/// Solve the cube described by `facelets`, building the shared tables on
/// the first call.
///
/// `start_phase` is 0 to search from scratch, or 1 to assume the cube is
/// already in the phase 2 subgroup and only run phase 2. The search returns
/// the best solution it knows once `time_limit_seconds` have passed.
///
/// # Errors
///
/// See `SolveError`. Arguments are checked before any table is built.
pub fn solve(
    facelets: &str,
    start_phase: u8,
    time_limit_seconds: f64,
) -> Result<Solution, SolveError> {
    let (cube, start_phase, time_limit) =
        parse_arguments(facelets, start_phase, time_limit_seconds)?;
    let tables = Tables::shared()?;
    solve_cube(tables, &cube, start_phase, time_limit)
}

/// Like `solve`, with explicitly provided tables.
///
/// # Errors
///
/// See `SolveError`.
pub fn solve_with_tables(
    tables: &Tables,
    facelets: &str,
    start_phase: u8,
    time_limit_seconds: f64,
) -> Result<Solution, SolveError> {
    let (cube, start_phase, time_limit) =
        parse_arguments(facelets, start_phase, time_limit_seconds)?;
    solve_cube(tables, &cube, start_phase, time_limit)
}

fn parse_arguments(
    facelets: &str,
    start_phase: u8,
    time_limit_seconds: f64,
) -> Result<(CubieCube, StartPhase, Duration), SolveError> {
    let start_phase = StartPhase::try_from(start_phase)?;
    if !(time_limit_seconds.is_finite() && time_limit_seconds > 0.0) {
        return Err(SolveError::InvalidTimeLimit(time_limit_seconds));
    }
    // Too long to represent means no deadline at all
    let time_limit = Duration::try_from_secs_f64(time_limit_seconds).unwrap_or(Duration::MAX);
    let cube = facelets.parse::<CubieCube>()?;
    Ok((cube, start_phase, time_limit))
}

fn solve_cube(
    tables: &Tables,
    cube: &CubieCube,
    start_phase: StartPhase,
    time_limit: Duration,
) -> Result<Solution, SolveError> {
    Ok(TwoPhaseSolver::new(tables)
        .with_start_phase(start_phase)
        .with_time_limit(time_limit)
        .solve(cube)?)
}
