//! The two-phase search: an iterative deepening search into the phase 2
//! subgroup, followed by an iterative deepening search within it for every
//! phase 1 path found.

use crate::{
    coords::{Phase1Coords, Phase2Coords},
    cubie::CubieCube,
    moves::{Move, format_moves},
    start, success,
    tables::Tables,
    working,
};
use log::{debug, info, trace};
use std::{
    fmt,
    time::{Duration, Instant},
};
use thiserror::Error;

/// The deepest phase 1 bound the search tries. Every cube reaches the phase 2
/// subgroup in at most 12 moves, so this only matters for the hunt for
/// shorter solutions.
pub const MAX_PHASE1_DEPTH: u8 = 20;

/// Solutions are never longer than this. The first solution found is always
/// well below it.
pub const MAX_SOLUTION_LENGTH: usize = 30;

/// The number of nodes expanded between two reads of the clock.
pub const POLL_INTERVAL: u64 = 1024;

/// The deepest phase 2 search tried before the first solution is known.
/// Phase 1 paths whose completion needs more moves are revisited only if
/// phase 1 runs out without any solution.
pub const FIRST_PHASE2_DEPTH: u8 = 10;

/// Where the search starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StartPhase {
    /// Search from scratch.
    #[default]
    Phase1,
    /// Assume the cube is already in the phase 2 subgroup and only run
    /// phase 2.
    Phase2,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Invalid start phase {0}, expected 0 or 1")]
pub struct InvalidStartPhaseError(pub u8);

impl TryFrom<u8> for StartPhase {
    type Error = InvalidStartPhaseError;

    fn try_from(phase: u8) -> Result<Self, Self::Error> {
        match phase {
            0 => Ok(StartPhase::Phase1),
            1 => Ok(StartPhase::Phase2),
            _ => Err(InvalidStartPhaseError(phase)),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    #[error("No solution was found within the time limit of {limit:?}")]
    SearchTimeout { limit: Duration },
    #[error("The cube is not in the phase 2 subgroup, so the search cannot start in phase 2")]
    NotInPhase2Subgroup,
    #[error("A deep search still did not find a solution. It is unlikely that one exists")]
    SolutionDoesNotExist,
}

/// A solving sequence together with how long the search took.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub moves: Vec<Move>,
    pub elapsed: Duration,
    /// Whether the search finished proving that no shorter solution exists.
    pub proven_optimal: bool,
}

impl Solution {
    #[must_use]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for move_ in &self.moves {
            write!(f, "{move_} ")?;
        }
        write!(
            f,
            "({}f/{:.3}s)",
            self.moves.len(),
            self.elapsed.as_secs_f64()
        )
    }
}

pub struct TwoPhaseSolver<'t> {
    tables: &'t Tables,
    start_phase: StartPhase,
    time_limit: Option<Duration>,
    max_solution_length: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchStatus {
    Searching,
    TimedOut,
    TargetReached,
}

/// Everything a single search mutates. Owned by one `solve` call, so
/// independent solves never share state.
struct TwoPhaseSolverMutable {
    start_cube: CubieCube,
    phase1_moves: Vec<Move>,
    phase2_moves: Vec<Move>,
    best: Option<Vec<Move>>,
    /// Any new solution must be strictly shorter than this.
    length_bound: usize,
    deadline: Option<Instant>,
    /// The phase 2 depth cap that applies while `best` is `None`.
    phase2_cap: Option<u8>,
    /// No solution shorter than this was cut off by `phase2_cap`.
    skipped_bound: usize,
    nodes_visited: u64,
    status: SearchStatus,
}

impl TwoPhaseSolverMutable {
    fn new(start_cube: CubieCube, deadline: Option<Instant>, phase2_cap: Option<u8>) -> Self {
        Self {
            start_cube,
            phase1_moves: Vec::with_capacity(usize::from(MAX_PHASE1_DEPTH)),
            phase2_moves: Vec::with_capacity(MAX_SOLUTION_LENGTH),
            best: None,
            length_bound: MAX_SOLUTION_LENGTH + 1,
            deadline,
            phase2_cap,
            skipped_bound: usize::MAX,
            nodes_visited: 0,
            status: SearchStatus::Searching,
        }
    }

    /// Whether the best solution is known to be optimal, given that the
    /// search ruled out every shorter phase 1 path.
    fn is_proven_optimal(&self) -> bool {
        self.length_bound <= self.skipped_bound
    }

    /// Count a node expansion, reading the clock every `POLL_INTERVAL`
    /// nodes. Returns whether the search should go on.
    #[inline]
    fn expand_node(&mut self) -> bool {
        if self.nodes_visited % POLL_INTERVAL == 0
            && let Some(deadline) = self.deadline
            && Instant::now() >= deadline
        {
            self.status = SearchStatus::TimedOut;
        }
        self.nodes_visited += 1;
        self.status == SearchStatus::Searching
    }

    fn last_move(&self) -> Option<Move> {
        self.phase2_moves
            .last()
            .or(self.phase1_moves.last())
            .copied()
    }
}

impl<'t> TwoPhaseSolver<'t> {
    #[must_use]
    pub fn new(tables: &'t Tables) -> Self {
        Self {
            tables,
            start_phase: StartPhase::default(),
            time_limit: None,
            max_solution_length: None,
        }
    }

    #[must_use]
    pub fn with_start_phase(mut self, start_phase: StartPhase) -> Self {
        self.start_phase = start_phase;
        self
    }

    /// Stop searching once `time_limit` has passed and return the best
    /// solution found so far. Without a limit the search runs until the
    /// solution is proven optimal.
    #[must_use]
    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = Some(time_limit);
        self
    }

    /// Return as soon as a solution of at most `max_solution_length` moves is
    /// known.
    #[must_use]
    pub fn with_max_solution_length(mut self, max_solution_length: usize) -> Self {
        self.max_solution_length = Some(max_solution_length);
        self
    }

    /// Phase 1: a depth first search over all 18 moves for paths of exactly
    /// `remaining` more moves that end in the phase 2 subgroup.
    fn search_phase1(
        &self,
        mutable: &mut TwoPhaseSolverMutable,
        coords: Phase1Coords,
        remaining: u8,
    ) {
        if mutable.phase1_moves.len() + usize::from(remaining) >= mutable.length_bound
            || !mutable.expand_node()
        {
            return;
        }

        if remaining == 0 {
            // A path ending in a phase 2 move was already handed to phase 2
            // one move earlier, so it would only repeat that work.
            if coords.in_phase2_subgroup()
                && mutable.phase1_moves.last().is_none_or(|m| !m.is_phase2())
            {
                self.search_phase2_from_here(mutable);
            }
            return;
        }

        let move_tables = self.tables.moves();
        let pruning = self.tables.pruning();
        for move_ in Move::ALL {
            if mutable
                .phase1_moves
                .last()
                .is_some_and(|&previous| !move_.may_follow(previous))
            {
                continue;
            }
            let child = coords.apply(move_, move_tables);
            if pruning.phase1_heuristic(child) >= remaining {
                continue;
            }
            mutable.phase1_moves.push(move_);
            self.search_phase1(mutable, child, remaining - 1);
            mutable.phase1_moves.pop();
            if mutable.status != SearchStatus::Searching {
                return;
            }
        }
    }

    /// Run phase 2 IDA* on the cube reached by the current phase 1 path, for
    /// every bound that could still improve on the best solution.
    fn search_phase2_from_here(&self, mutable: &mut TwoPhaseSolverMutable) {
        let depth1 = mutable.phase1_moves.len();
        let Some(max_depth2) = mutable.length_bound.checked_sub(depth1 + 1) else {
            return;
        };
        let cube = mutable
            .start_cube
            .apply_moves(mutable.phase1_moves.iter().copied());
        let Some(coords) = Phase2Coords::from_cube(&cube) else {
            return;
        };

        let mut max_depth2 = u8::try_from(max_depth2).unwrap_or(u8::MAX);
        let mut capped = false;
        if mutable.best.is_none()
            && let Some(cap) = mutable.phase2_cap
            && cap < max_depth2
        {
            max_depth2 = cap;
            capped = true;
        }

        let h2 = self.tables.pruning().phase2_heuristic(coords);
        for depth2 in h2..=max_depth2 {
            if self.search_phase2(mutable, coords, depth2) {
                self.record_solution(mutable);
                return;
            }
            if mutable.status != SearchStatus::Searching {
                return;
            }
        }
        if capped {
            mutable.skipped_bound = mutable
                .skipped_bound
                .min(depth1 + usize::from(max_depth2) + 1);
        }
    }

    /// Phase 2: a depth first search over the phase 2 moves for exactly
    /// `remaining` more moves ending in the solved state. On success the
    /// moves are left on `mutable.phase2_moves`.
    fn search_phase2(
        &self,
        mutable: &mut TwoPhaseSolverMutable,
        coords: Phase2Coords,
        remaining: u8,
    ) -> bool {
        if !mutable.expand_node() {
            return false;
        }
        if remaining == 0 {
            return coords.is_solved();
        }

        let move_tables = self.tables.moves();
        let pruning = self.tables.pruning();
        for (column, move_) in Move::PHASE2.into_iter().enumerate() {
            if mutable
                .last_move()
                .is_some_and(|previous| !move_.may_follow(previous))
            {
                continue;
            }
            let child = coords.apply(column, move_tables);
            if pruning.phase2_heuristic(child) >= remaining {
                continue;
            }
            mutable.phase2_moves.push(move_);
            if self.search_phase2(mutable, child, remaining - 1) {
                return true;
            }
            mutable.phase2_moves.pop();
            if mutable.status != SearchStatus::Searching {
                return false;
            }
        }
        false
    }

    fn record_solution(&self, mutable: &mut TwoPhaseSolverMutable) {
        let mut solution = mutable.phase1_moves.clone();
        solution.append(&mut mutable.phase2_moves);
        trace!(
            working!("Found a solution of length {} ({} + {}): {}"),
            solution.len(),
            mutable.phase1_moves.len(),
            solution.len() - mutable.phase1_moves.len(),
            format_moves(&solution)
        );
        mutable.length_bound = solution.len();
        if self
            .max_solution_length
            .is_some_and(|max_solution_length| solution.len() <= max_solution_length)
        {
            mutable.status = SearchStatus::TargetReached;
        }
        mutable.best = Some(solution);
    }

    /// The outer loop of phase 1 over increasing depth bounds. Returns whether
    /// the best solution was proven optimal.
    fn run_phase1(&self, mutable: &mut TwoPhaseSolverMutable) -> bool {
        let coords = Phase1Coords::from_cube(&mutable.start_cube);
        let h1 = self.tables.pruning().phase1_heuristic(coords);
        for depth in h1..=MAX_PHASE1_DEPTH {
            if usize::from(depth) >= mutable.length_bound {
                // Every solution found from here on would be at least this
                // long.
                return mutable.is_proven_optimal();
            }
            debug!(working!("Searching phase 1 depth {}..."), depth);
            let depth_start = Instant::now();
            let nodes_before = mutable.nodes_visited;
            self.search_phase1(mutable, coords, depth);
            debug!(
                working!("Traversed {} nodes in {:.3}s"),
                mutable.nodes_visited - nodes_before,
                depth_start.elapsed().as_secs_f64()
            );
            if mutable.status != SearchStatus::Searching {
                return false;
            }
        }
        usize::from(MAX_PHASE1_DEPTH) + 1 >= mutable.length_bound && mutable.is_proven_optimal()
    }

    /// Run the two-phase search on `cube`.
    ///
    /// # Errors
    ///
    /// - `SearchTimeout` if the time limit passed before any solution was
    ///   found.
    /// - `NotInPhase2Subgroup` if the search should start in phase 2 but the
    ///   cube is not in the phase 2 subgroup.
    /// - `SolutionDoesNotExist` if the search space was exhausted, which does
    ///   not happen for valid cubes.
    pub fn solve(&self, cube: &CubieCube) -> Result<Solution, SolverError> {
        info!(start!("Searching for a solution"));
        let start = Instant::now();

        if cube.is_solved() {
            info!(success!("The cube is already solved"));
            return Ok(Solution {
                moves: vec![],
                elapsed: start.elapsed(),
                proven_optimal: true,
            });
        }

        let deadline = self
            .time_limit
            .and_then(|time_limit| start.checked_add(time_limit));

        let (mutable, proven_optimal) = match self.start_phase {
            StartPhase::Phase1 => {
                let mut mutable =
                    TwoPhaseSolverMutable::new(*cube, deadline, Some(FIRST_PHASE2_DEPTH));
                let mut proven_optimal = self.run_phase1(&mut mutable);
                if mutable.best.is_none()
                    && mutable.status == SearchStatus::Searching
                    && mutable.skipped_bound != usize::MAX
                {
                    debug!(working!("Searching again without the phase 2 depth cap"));
                    mutable.phase2_cap = None;
                    mutable.skipped_bound = usize::MAX;
                    proven_optimal = self.run_phase1(&mut mutable);
                }
                (mutable, proven_optimal)
            }
            StartPhase::Phase2 => {
                if !Phase1Coords::from_cube(cube).in_phase2_subgroup() {
                    return Err(SolverError::NotInPhase2Subgroup);
                }
                let mut mutable = TwoPhaseSolverMutable::new(*cube, deadline, None);
                self.search_phase2_from_here(&mut mutable);
                (mutable, false)
            }
        };
        let elapsed = start.elapsed();

        match mutable.best {
            Some(moves) => {
                info!(
                    success!("Found a solution of length {} in {:.3}s after {} nodes"),
                    moves.len(),
                    elapsed.as_secs_f64(),
                    mutable.nodes_visited
                );
                Ok(Solution {
                    moves,
                    elapsed,
                    proven_optimal,
                })
            }
            None if mutable.status == SearchStatus::TimedOut => Err(SolverError::SearchTimeout {
                limit: self.time_limit.unwrap_or_default(),
            }),
            None => Err(SolverError::SolutionDoesNotExist),
        }
    }
}
