//! Pruning tables: exact distances to the goal in a projection of the cube
//! onto two coordinates, used as admissible heuristics by the search.

use crate::{
    coords::{
        MoveTables, N_CORNERS, N_FLIP, N_SLICE, N_SLICE_PERM, N_TWIST, N_UD_EDGES, Phase1Coords,
        Phase2Coords,
    },
    moves::{MOVE_COUNT, PHASE2_MOVE_COUNT},
    start, success, working,
};
use log::{debug, info};
use std::time::Instant;
use thiserror::Error;

/// Entry of a table cell not reached by the breadth first search.
pub const UNVISITED: u8 = u8::MAX;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableBuildError {
    #[error("Pruning table {name} is incomplete: {filled} of {size} entries were reached")]
    Incomplete {
        name: &'static str,
        filled: usize,
        size: usize,
    },
}

pub struct PruningTable {
    name: &'static str,
    table: Box<[u8]>,
}

impl PruningTable {
    /// Fill a table of `size` entries by breadth first search from `goal`,
    /// where `next(index, column)` is the entry reached by the move in
    /// `column`. The move set must be closed under inverses, so that the
    /// distance from the goal is also the distance to it.
    #[must_use]
    pub fn generate(
        name: &'static str,
        size: usize,
        columns: usize,
        goal: usize,
        next: impl Fn(usize, usize) -> usize,
    ) -> Self {
        let start = Instant::now();
        let mut table = vec![UNVISITED; size].into_boxed_slice();
        table[goal] = 0;
        let mut frontier = vec![goal];
        let mut depth = 0;
        while !frontier.is_empty() {
            debug!(
                working!("{}: {} entries at depth {}"),
                name,
                frontier.len(),
                depth
            );
            let mut next_frontier = vec![];
            for index in frontier {
                for column in 0..columns {
                    let neighbor = next(index, column);
                    if table[neighbor] == UNVISITED {
                        table[neighbor] = depth + 1;
                        next_frontier.push(neighbor);
                    }
                }
            }
            frontier = next_frontier;
            depth += 1;
        }
        debug!(
            working!("{}: generated in {:.3}s"),
            name,
            start.elapsed().as_secs_f64()
        );
        Self { name, table }
    }

    #[must_use]
    #[inline]
    pub fn get(&self, index: usize) -> u8 {
        self.table[index]
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// The largest distance in the table.
    #[must_use]
    pub fn depth(&self) -> u8 {
        self.table
            .iter()
            .copied()
            .filter(|&entry| entry != UNVISITED)
            .max()
            .unwrap_or(0)
    }

    /// Check that the search reached every entry. A table with holes would
    /// report `UNVISITED` as a distance and break admissibility.
    ///
    /// # Errors
    ///
    /// If any entry is still `UNVISITED`.
    pub fn verify_complete(&self) -> Result<(), TableBuildError> {
        let filled = self.table.iter().filter(|&&entry| entry != UNVISITED).count();
        if filled == self.table.len() {
            Ok(())
        } else {
            Err(TableBuildError::Incomplete {
                name: self.name,
                filled,
                size: self.table.len(),
            })
        }
    }
}

/// The four pruning tables: twist and flip against the slice placement for
/// phase 1, and the corner and U/D edge permutations against the slice
/// permutation for phase 2.
pub struct PruningTables {
    twist_slice: PruningTable,
    flip_slice: PruningTable,
    corners_slice_perm: PruningTable,
    ud_edges_slice_perm: PruningTable,
}

fn slice_next(move_tables: &MoveTables, slice: usize, column: usize) -> usize {
    let slice_sorted = (slice * N_SLICE_PERM) as u16;
    usize::from(move_tables.slice_sorted.next(slice_sorted, column)) / N_SLICE_PERM
}

impl PruningTables {
    /// Build all four tables in parallel and check that each is complete.
    ///
    /// # Errors
    ///
    /// If any table has unreached entries.
    pub fn generate(move_tables: &MoveTables) -> Result<Self, TableBuildError> {
        info!(start!("Generating pruning tables"));
        let start = Instant::now();

        let ((twist_slice, flip_slice), (corners_slice_perm, ud_edges_slice_perm)) = rayon::join(
            || {
                rayon::join(
                    || {
                        PruningTable::generate(
                            "twist-slice",
                            N_SLICE * N_TWIST,
                            MOVE_COUNT,
                            0,
                            |index, column| {
                                let twist = move_tables.twist.next((index % N_TWIST) as u16, column);
                                slice_next(move_tables, index / N_TWIST, column) * N_TWIST
                                    + usize::from(twist)
                            },
                        )
                    },
                    || {
                        PruningTable::generate(
                            "flip-slice",
                            N_SLICE * N_FLIP,
                            MOVE_COUNT,
                            0,
                            |index, column| {
                                let flip = move_tables.flip.next((index % N_FLIP) as u16, column);
                                slice_next(move_tables, index / N_FLIP, column) * N_FLIP
                                    + usize::from(flip)
                            },
                        )
                    },
                )
            },
            || {
                rayon::join(
                    || {
                        PruningTable::generate(
                            "corners-slice-perm",
                            N_CORNERS * N_SLICE_PERM,
                            PHASE2_MOVE_COUNT,
                            0,
                            |index, column| {
                                let corners = move_tables
                                    .corners
                                    .next((index / N_SLICE_PERM) as u16, column);
                                let slice_perm = move_tables
                                    .slice_perm
                                    .next((index % N_SLICE_PERM) as u16, column);
                                usize::from(corners) * N_SLICE_PERM + usize::from(slice_perm)
                            },
                        )
                    },
                    || {
                        PruningTable::generate(
                            "ud-edges-slice-perm",
                            N_UD_EDGES * N_SLICE_PERM,
                            PHASE2_MOVE_COUNT,
                            0,
                            |index, column| {
                                let ud_edges = move_tables
                                    .ud_edges
                                    .next((index / N_SLICE_PERM) as u16, column);
                                let slice_perm = move_tables
                                    .slice_perm
                                    .next((index % N_SLICE_PERM) as u16, column);
                                usize::from(ud_edges) * N_SLICE_PERM + usize::from(slice_perm)
                            },
                        )
                    },
                )
            },
        );

        let tables = Self {
            twist_slice,
            flip_slice,
            corners_slice_perm,
            ud_edges_slice_perm,
        };
        for table in tables.all() {
            table.verify_complete()?;
        }

        info!(
            success!("Pruning tables generated in {:.3}s"),
            start.elapsed().as_secs_f64()
        );
        Ok(tables)
    }

    #[must_use]
    pub fn all(&self) -> [&PruningTable; 4] {
        [
            &self.twist_slice,
            &self.flip_slice,
            &self.corners_slice_perm,
            &self.ud_edges_slice_perm,
        ]
    }

    /// A lower bound on the number of moves needed to reach the phase 2
    /// subgroup.
    #[must_use]
    #[inline]
    pub fn phase1_heuristic(&self, coords: Phase1Coords) -> u8 {
        let slice = usize::from(coords.slice());
        let twist = self
            .twist_slice
            .get(slice * N_TWIST + usize::from(coords.twist));
        let flip = self.flip_slice.get(slice * N_FLIP + usize::from(coords.flip));
        twist.max(flip)
    }

    /// A lower bound on the number of phase 2 moves needed to solve a cube
    /// in the phase 2 subgroup.
    #[must_use]
    #[inline]
    pub fn phase2_heuristic(&self, coords: Phase2Coords) -> u8 {
        let slice_perm = usize::from(coords.slice_perm);
        let corners = self
            .corners_slice_perm
            .get(usize::from(coords.corners) * N_SLICE_PERM + slice_perm);
        let ud_edges = self
            .ud_edges_slice_perm
            .get(usize::from(coords.ud_edges) * N_SLICE_PERM + slice_perm);
        corners.max(ud_edges)
    }
}
