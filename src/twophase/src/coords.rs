//! Coordinates: compact integer projections of a `CubieCube`, and the move
//! tables that update them incrementally.
//!
//! Phase 1 works on the twist of the corners, the flip of the edges and the
//! placement of the four UD-slice edges. Phase 2, where all of those are
//! solved, works on the permutations of the corners, of the eight U/D layer
//! edges and of the four slice edges. Every coordinate is zero on the solved
//! cube.

use crate::{
    cubie::{CORNER_COUNT, CubieCube, EDGE_COUNT},
    moves::{MOVE_COUNT, Move, PHASE2_MOVE_COUNT},
};
use rayon::prelude::*;

pub const N_TWIST: usize = 2187;
pub const N_FLIP: usize = 2048;
pub const N_SLICE: usize = 495;
pub const N_SLICE_PERM: usize = 24;
pub const N_SLICE_SORTED: usize = N_SLICE * N_SLICE_PERM;
pub const N_CORNERS: usize = 40320;
pub const N_UD_EDGES: usize = 40320;

/// The first edge slot of the UD-slice.
const SLICE_START: usize = 8;

const FACTORIAL: [u32; 13] = {
    let mut arr = [1; 13];
    let mut i = 1;
    while i < arr.len() {
        arr[i] = arr[i - 1] * i as u32;
        i += 1;
    }
    arr
};

const fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let mut result = 1;
    let mut i = 0;
    while i < k {
        result = result * (n - i) / (i + 1);
        i += 1;
    }
    result
}

/// The lexicographic rank of the ordering of `perm`, which must hold
/// distinct values. Only the relative order of the values matters.
fn permutation_rank(perm: &[u8]) -> u16 {
    let n = perm.len();
    let mut rank = 0;
    for i in 0..n - 1 {
        let smaller_after = perm[i + 1..].iter().filter(|&&x| x < perm[i]).count() as u32;
        rank += smaller_after * FACTORIAL[n - 1 - i];
    }
    rank as u16
}

/// Inverse of `permutation_rank`: fill `out` with the ordering of `values`
/// (sorted ascending) that has the given rank.
fn permutation_unrank(mut rank: u32, values: &[u8], out: &mut [u8]) {
    debug_assert_eq!(values.len(), out.len());
    let n = values.len();
    let mut pool = [0_u8; EDGE_COUNT];
    pool[..n].copy_from_slice(values);
    let mut remaining = n;
    for (i, slot) in out.iter_mut().enumerate() {
        let fact = FACTORIAL[n - 1 - i];
        let k = (rank / fact) as usize;
        rank %= fact;
        *slot = pool[k];
        pool.copy_within(k + 1..remaining, k);
        remaining -= 1;
    }
}

/// A projection of the cube onto `0..COUNT`.
pub trait Coordinate {
    const COUNT: usize;

    /// Read the coordinate. Constant time, no search.
    fn get(cube: &CubieCube) -> u16;

    /// Modify `cube` so that `Self::get` returns `coord`, leaving the parts
    /// of the cube the coordinate does not describe in some valid
    /// arrangement. Only used to build move tables.
    fn set(cube: &mut CubieCube, coord: u16);
}

/// Orientation of the first seven corners in base 3.
pub struct Twist;

/// Orientation of the first eleven edges in base 2.
pub struct Flip;

/// Which four slots hold the UD-slice edges (`coord / 24`, a combination
/// index) and in what order (`coord % 24`).
pub struct SliceSorted;

/// Permutation of all eight corners.
pub struct Corners;

/// Permutation of the eight U/D layer edges. Only meaningful in phase 2.
pub struct UdEdges;

/// Permutation of the four UD-slice edges. Only meaningful in phase 2.
pub struct SlicePerm;

impl Coordinate for Twist {
    const COUNT: usize = N_TWIST;

    fn get(cube: &CubieCube) -> u16 {
        cube.co[..CORNER_COUNT - 1]
            .iter()
            .fold(0, |acc, &co| acc * 3 + u16::from(co))
    }

    fn set(cube: &mut CubieCube, mut coord: u16) {
        let mut sum = 0;
        for co in cube.co[..CORNER_COUNT - 1].iter_mut().rev() {
            *co = (coord % 3) as u8;
            sum += *co;
            coord /= 3;
        }
        cube.co[CORNER_COUNT - 1] = (3 - sum % 3) % 3;
    }
}

impl Coordinate for Flip {
    const COUNT: usize = N_FLIP;

    fn get(cube: &CubieCube) -> u16 {
        cube.eo[..EDGE_COUNT - 1]
            .iter()
            .fold(0, |acc, &eo| acc * 2 + u16::from(eo))
    }

    fn set(cube: &mut CubieCube, mut coord: u16) {
        let mut sum = 0;
        for eo in cube.eo[..EDGE_COUNT - 1].iter_mut().rev() {
            *eo = (coord % 2) as u8;
            sum += *eo;
            coord /= 2;
        }
        cube.eo[EDGE_COUNT - 1] = sum % 2;
    }
}

impl Coordinate for SliceSorted {
    const COUNT: usize = N_SLICE_SORTED;

    fn get(cube: &CubieCube) -> u16 {
        let mut combination = 0;
        let mut found = 0;
        let mut slice_edges = [0; 4];
        for slot in (0..EDGE_COUNT).rev() {
            let edge = cube.ep[slot];
            if usize::from(edge) >= SLICE_START {
                combination += binomial(EDGE_COUNT - 1 - slot, found + 1);
                slice_edges[3 - found] = edge;
                found += 1;
            }
        }
        (combination * N_SLICE_PERM) as u16 + permutation_rank(&slice_edges)
    }

    fn set(cube: &mut CubieCube, coord: u16) {
        let mut combination = usize::from(coord) / N_SLICE_PERM;
        let mut slice_edges = [0; 4];
        permutation_unrank(
            u32::from(coord) % N_SLICE_PERM as u32,
            &[8, 9, 10, 11],
            &mut slice_edges,
        );

        let mut remaining = 4;
        let mut other_edges = 0..SLICE_START as u8;
        for slot in 0..EDGE_COUNT {
            let c = binomial(EDGE_COUNT - 1 - slot, remaining);
            if remaining > 0 && combination >= c {
                cube.ep[slot] = slice_edges[4 - remaining];
                combination -= c;
                remaining -= 1;
            } else {
                cube.ep[slot] = other_edges.next().unwrap_or_default();
            }
        }
    }
}

impl Coordinate for Corners {
    const COUNT: usize = N_CORNERS;

    fn get(cube: &CubieCube) -> u16 {
        permutation_rank(&cube.cp)
    }

    fn set(cube: &mut CubieCube, coord: u16) {
        permutation_unrank(u32::from(coord), &CubieCube::SOLVED.cp, &mut cube.cp);
    }
}

impl Coordinate for UdEdges {
    const COUNT: usize = N_UD_EDGES;

    fn get(cube: &CubieCube) -> u16 {
        permutation_rank(&cube.ep[..SLICE_START])
    }

    fn set(cube: &mut CubieCube, coord: u16) {
        let solved = CubieCube::SOLVED.ep;
        permutation_unrank(
            u32::from(coord),
            &solved[..SLICE_START],
            &mut cube.ep[..SLICE_START],
        );
        cube.ep[SLICE_START..].copy_from_slice(&solved[SLICE_START..]);
    }
}

impl Coordinate for SlicePerm {
    const COUNT: usize = N_SLICE_PERM;

    fn get(cube: &CubieCube) -> u16 {
        permutation_rank(&cube.ep[SLICE_START..])
    }

    fn set(cube: &mut CubieCube, coord: u16) {
        let solved = CubieCube::SOLVED.ep;
        cube.ep[..SLICE_START].copy_from_slice(&solved[..SLICE_START]);
        permutation_unrank(
            u32::from(coord),
            &solved[SLICE_START..],
            &mut cube.ep[SLICE_START..],
        );
    }
}

/// Transition table of one coordinate: the coordinate reached from `coord`
/// by the move in column `column`.
pub struct MoveTable {
    columns: usize,
    table: Box<[u16]>,
}

impl MoveTable {
    /// Tabulate `C` under `moves`. Rows are independent, so they are filled
    /// in parallel.
    #[must_use]
    pub fn generate<C: Coordinate>(moves: &[Move]) -> Self {
        let columns = moves.len();
        let mut table = vec![0; C::COUNT * columns].into_boxed_slice();
        table
            .par_chunks_mut(columns)
            .enumerate()
            .for_each(|(coord, row)| {
                let mut cube = CubieCube::SOLVED;
                C::set(&mut cube, coord as u16);
                for (entry, &move_) in row.iter_mut().zip(moves) {
                    *entry = C::get(&cube.apply(move_));
                }
            });
        Self { columns, table }
    }

    #[must_use]
    #[inline]
    pub fn next(&self, coord: u16, column: usize) -> u16 {
        self.table[usize::from(coord) * self.columns + column]
    }

    #[must_use]
    pub fn columns(&self) -> usize {
        self.columns
    }
}

/// All move tables. Phase 1 tables have a column per move of `Move::ALL`,
/// phase 2 tables a column per move of `Move::PHASE2`.
pub struct MoveTables {
    pub twist: MoveTable,
    pub flip: MoveTable,
    pub slice_sorted: MoveTable,
    pub corners: MoveTable,
    pub ud_edges: MoveTable,
    pub slice_perm: MoveTable,
}

impl MoveTables {
    #[must_use]
    pub fn generate() -> Self {
        let tables = Self {
            twist: MoveTable::generate::<Twist>(&Move::ALL),
            flip: MoveTable::generate::<Flip>(&Move::ALL),
            slice_sorted: MoveTable::generate::<SliceSorted>(&Move::ALL),
            corners: MoveTable::generate::<Corners>(&Move::PHASE2),
            ud_edges: MoveTable::generate::<UdEdges>(&Move::PHASE2),
            slice_perm: MoveTable::generate::<SlicePerm>(&Move::PHASE2),
        };
        debug_assert_eq!(tables.twist.columns(), MOVE_COUNT);
        debug_assert_eq!(tables.corners.columns(), PHASE2_MOVE_COUNT);
        tables
    }
}

/// The phase 1 coordinates of a cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Phase1Coords {
    pub twist: u16,
    pub flip: u16,
    pub slice_sorted: u16,
}

impl Phase1Coords {
    #[must_use]
    pub fn from_cube(cube: &CubieCube) -> Self {
        Self {
            twist: Twist::get(cube),
            flip: Flip::get(cube),
            slice_sorted: SliceSorted::get(cube),
        }
    }

    /// The coordinates after applying `move_`, from the tables alone.
    #[must_use]
    #[inline]
    pub fn apply(self, move_: Move, move_tables: &MoveTables) -> Self {
        let column = move_.index();
        Self {
            twist: move_tables.twist.next(self.twist, column),
            flip: move_tables.flip.next(self.flip, column),
            slice_sorted: move_tables.slice_sorted.next(self.slice_sorted, column),
        }
    }

    /// The slice placement alone, in `0..495`.
    #[must_use]
    pub fn slice(self) -> u16 {
        self.slice_sorted / N_SLICE_PERM as u16
    }

    /// Whether the cube is in the phase 2 subgroup: no twisted corners, no
    /// flipped edges, and the slice edges in the slice.
    #[must_use]
    pub fn in_phase2_subgroup(self) -> bool {
        self.twist == 0 && self.flip == 0 && self.slice() == 0
    }
}

/// The phase 2 coordinates of a cube in the phase 2 subgroup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Phase2Coords {
    pub corners: u16,
    pub ud_edges: u16,
    pub slice_perm: u16,
}

impl Phase2Coords {
    /// Returns `None` if the cube is not in the phase 2 subgroup.
    #[must_use]
    pub fn from_cube(cube: &CubieCube) -> Option<Self> {
        if !Phase1Coords::from_cube(cube).in_phase2_subgroup() {
            return None;
        }
        Some(Self {
            corners: Corners::get(cube),
            ud_edges: UdEdges::get(cube),
            slice_perm: SlicePerm::get(cube),
        })
    }

    /// The coordinates after applying `Move::PHASE2[column]`.
    #[must_use]
    #[inline]
    pub fn apply(self, column: usize, move_tables: &MoveTables) -> Self {
        Self {
            corners: move_tables.corners.next(self.corners, column),
            ud_edges: move_tables.ud_edges.next(self.ud_edges, column),
            slice_perm: move_tables.slice_perm.next(self.slice_perm, column),
        }
    }

    #[must_use]
    pub fn is_solved(self) -> bool {
        self.corners == 0 && self.ud_edges == 0 && self.slice_perm == 0
    }
}
