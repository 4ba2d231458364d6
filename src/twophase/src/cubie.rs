//! The cubie level representation of the cube: which corner and edge sits in
//! every slot, and how it is twisted or flipped there.
//!
//! Corner slots are numbered `URF UFL ULB UBR DFR DLF DBL DRB` and edge slots
//! `UR UF UL UB DR DF DL DB FR FL BL BR`. The last four edges are the UD-slice
//! edges that phase 1 gathers into the middle layer.

use crate::moves::{Move, MoveIndexError};
use thiserror::Error;

pub const CORNER_COUNT: usize = 8;
pub const EDGE_COUNT: usize = 12;

/// A cube in cubie representation. Every constructor validates the cube, and
/// every operation preserves validity, so a `CubieCube` is always a reachable
/// state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CubieCube {
    pub(crate) cp: [u8; CORNER_COUNT],
    pub(crate) co: [u8; CORNER_COUNT],
    pub(crate) ep: [u8; EDGE_COUNT],
    pub(crate) eo: [u8; EDGE_COUNT],
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidStateError {
    #[error("Expected 54 facelets but got {actual}")]
    InvalidLength { actual: usize },
    #[error("Invalid facelet label {label:?} at position {position}, expected one of URFDLB")]
    InvalidLabel { label: char, position: usize },
    #[error("Facelet label {label} occurs {count} times, expected exactly 9")]
    InvalidLabelCount { label: char, count: usize },
    #[error("The centre of face {face} is labelled {actual}")]
    MisplacedCenter { face: char, actual: char },
    #[error("The stickers of corner slot {slot} do not form a corner")]
    InvalidCorner { slot: usize },
    #[error("The stickers of edge slot {slot} do not form an edge")]
    InvalidEdge { slot: usize },
    #[error("The corner permutation is not a permutation of 0..8: {0:?}")]
    InvalidCornerPermutation([u8; CORNER_COUNT]),
    #[error("The edge permutation is not a permutation of 0..12: {0:?}")]
    InvalidEdgePermutation([u8; EDGE_COUNT]),
    #[error("Corner slot {slot} has orientation {value}, expected a value between 0 and 2")]
    InvalidCornerOrientation { slot: usize, value: u8 },
    #[error("Edge slot {slot} has orientation {value}, expected a value between 0 and 1")]
    InvalidEdgeOrientation { slot: usize, value: u8 },
    #[error("Corner orientations sum to {sum}, which is not divisible by 3 (twisted corner)")]
    CornerTwist { sum: u32 },
    #[error("Edge orientations sum to {sum}, which is not divisible by 2 (flipped edge)")]
    EdgeFlip { sum: u32 },
    #[error("Corner and edge permutations have different parities (swapped pieces)")]
    ParityMismatch,
}

const fn basic_move(
    cp: [u8; CORNER_COUNT],
    co: [u8; CORNER_COUNT],
    ep: [u8; EDGE_COUNT],
    eo: [u8; EDGE_COUNT],
) -> CubieCube {
    CubieCube { cp, co, ep, eo }
}

/// Clockwise quarter turns of `U R F D L B`, as cubes.
pub(crate) const BASIC_MOVE_CUBES: [CubieCube; 6] = [
    basic_move(
        [3, 0, 1, 2, 4, 5, 6, 7],
        [0, 0, 0, 0, 0, 0, 0, 0],
        [3, 0, 1, 2, 4, 5, 6, 7, 8, 9, 10, 11],
        [0; EDGE_COUNT],
    ),
    basic_move(
        [4, 1, 2, 0, 7, 5, 6, 3],
        [2, 0, 0, 1, 1, 0, 0, 2],
        [8, 1, 2, 3, 11, 5, 6, 7, 4, 9, 10, 0],
        [0; EDGE_COUNT],
    ),
    basic_move(
        [1, 5, 2, 3, 0, 4, 6, 7],
        [1, 2, 0, 0, 2, 1, 0, 0],
        [0, 9, 2, 3, 4, 8, 6, 7, 1, 5, 10, 11],
        [0, 1, 0, 0, 0, 1, 0, 0, 1, 1, 0, 0],
    ),
    basic_move(
        [0, 1, 2, 3, 5, 6, 7, 4],
        [0, 0, 0, 0, 0, 0, 0, 0],
        [0, 1, 2, 3, 5, 6, 7, 4, 8, 9, 10, 11],
        [0; EDGE_COUNT],
    ),
    basic_move(
        [0, 2, 6, 3, 4, 1, 5, 7],
        [0, 1, 2, 0, 0, 2, 1, 0],
        [0, 1, 10, 3, 4, 5, 9, 7, 8, 2, 6, 11],
        [0; EDGE_COUNT],
    ),
    basic_move(
        [0, 1, 3, 7, 4, 5, 2, 6],
        [0, 0, 1, 2, 0, 0, 2, 1],
        [0, 1, 2, 11, 4, 5, 6, 10, 8, 9, 3, 7],
        [0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 1, 1],
    ),
];

/// Whether `perm` is an odd permutation.
fn odd_parity(perm: &[u8]) -> bool {
    let mut inversions = 0;
    for i in 0..perm.len() {
        for j in (i + 1)..perm.len() {
            if perm[j] < perm[i] {
                inversions += 1;
            }
        }
    }
    inversions % 2 == 1
}

fn is_permutation(perm: &[u8]) -> bool {
    let mut seen = 0_u32;
    for &piece in perm {
        if usize::from(piece) >= perm.len() || seen & (1 << piece) != 0 {
            return false;
        }
        seen |= 1 << piece;
    }
    true
}

impl Default for CubieCube {
    fn default() -> Self {
        Self::SOLVED
    }
}

impl CubieCube {
    pub const SOLVED: CubieCube = CubieCube {
        cp: [0, 1, 2, 3, 4, 5, 6, 7],
        co: [0; CORNER_COUNT],
        ep: [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11],
        eo: [0; EDGE_COUNT],
    };

    #[must_use]
    pub const fn identity() -> Self {
        Self::SOLVED
    }

    /// Create a cube from its four arrays, where `cp[i]` is the corner in slot
    /// `i` and `co[i]` its twist, and likewise for the edges.
    ///
    /// # Errors
    ///
    /// If the arrays do not describe a reachable state. See
    /// `InvalidStateError`.
    pub fn from_parts(
        cp: [u8; CORNER_COUNT],
        co: [u8; CORNER_COUNT],
        ep: [u8; EDGE_COUNT],
        eo: [u8; EDGE_COUNT],
    ) -> Result<Self, InvalidStateError> {
        let cube = CubieCube { cp, co, ep, eo };
        cube.verify()?;
        Ok(cube)
    }

    /// Check every structural invariant of the cube.
    ///
    /// # Errors
    ///
    /// The first violated invariant, see `InvalidStateError`.
    pub fn verify(&self) -> Result<(), InvalidStateError> {
        if !is_permutation(&self.cp) {
            return Err(InvalidStateError::InvalidCornerPermutation(self.cp));
        }
        if !is_permutation(&self.ep) {
            return Err(InvalidStateError::InvalidEdgePermutation(self.ep));
        }
        if let Some((slot, &value)) = self.co.iter().enumerate().find(|&(_, &co)| co > 2) {
            return Err(InvalidStateError::InvalidCornerOrientation { slot, value });
        }
        if let Some((slot, &value)) = self.eo.iter().enumerate().find(|&(_, &eo)| eo > 1) {
            return Err(InvalidStateError::InvalidEdgeOrientation { slot, value });
        }
        let sum: u32 = self.co.iter().copied().map(u32::from).sum();
        if sum % 3 != 0 {
            return Err(InvalidStateError::CornerTwist { sum });
        }
        let sum: u32 = self.eo.iter().copied().map(u32::from).sum();
        if sum % 2 != 0 {
            return Err(InvalidStateError::EdgeFlip { sum });
        }
        if self.corner_parity() != self.edge_parity() {
            return Err(InvalidStateError::ParityMismatch);
        }
        Ok(())
    }

    #[must_use]
    pub fn corner_permutation(&self) -> &[u8; CORNER_COUNT] {
        &self.cp
    }

    #[must_use]
    pub fn corner_orientation(&self) -> &[u8; CORNER_COUNT] {
        &self.co
    }

    #[must_use]
    pub fn edge_permutation(&self) -> &[u8; EDGE_COUNT] {
        &self.ep
    }

    #[must_use]
    pub fn edge_orientation(&self) -> &[u8; EDGE_COUNT] {
        &self.eo
    }

    /// `true` if the corner permutation is odd.
    #[must_use]
    pub fn corner_parity(&self) -> bool {
        odd_parity(&self.cp)
    }

    /// `true` if the edge permutation is odd.
    #[must_use]
    pub fn edge_parity(&self) -> bool {
        odd_parity(&self.ep)
    }

    #[must_use]
    pub fn is_solved(&self) -> bool {
        *self == Self::SOLVED
    }

    /// Compose `a` and `b` into self: the state reached by applying `b` after
    /// `a`.
    pub fn replace_compose(&mut self, a: &Self, b: &Self) {
        for i in 0..CORNER_COUNT {
            let from = usize::from(b.cp[i]);
            self.cp[i] = a.cp[from];
            self.co[i] = (a.co[from] + b.co[i]) % 3;
        }
        for i in 0..EDGE_COUNT {
            let from = usize::from(b.ep[i]);
            self.ep[i] = a.ep[from];
            self.eo[i] = (a.eo[from] + b.eo[i]) % 2;
        }
    }

    /// The state reached by applying `other`, an elementary or composite
    /// move given as a cube, to `self`.
    #[must_use]
    pub fn compose(&self, other: &Self) -> Self {
        let mut result = Self::SOLVED;
        result.replace_compose(self, other);
        result
    }

    #[must_use]
    pub fn apply(&self, move_: Move) -> Self {
        self.compose(move_.cube())
    }

    #[must_use]
    pub fn apply_moves(&self, moves: impl IntoIterator<Item = Move>) -> Self {
        moves
            .into_iter()
            .fold(*self, |cube, move_| cube.apply(move_))
    }

    /// Apply the elementary move at `move_index` in `Move::ALL`.
    ///
    /// # Errors
    ///
    /// If `move_index` is not in `[0, 18)`.
    pub fn multiply(&self, move_index: usize) -> Result<Self, MoveIndexError> {
        Ok(self.apply(Move::from_index(move_index)?))
    }

    /// The group inverse: `self.compose(&self.inverse())` is solved.
    #[must_use]
    pub fn inverse(&self) -> Self {
        let mut inverse = Self::SOLVED;
        for i in 0..CORNER_COUNT {
            inverse.cp[usize::from(self.cp[i])] = i as u8;
        }
        for i in 0..CORNER_COUNT {
            inverse.co[i] = (3 - self.co[usize::from(inverse.cp[i])]) % 3;
        }
        for i in 0..EDGE_COUNT {
            inverse.ep[usize::from(self.ep[i])] = i as u8;
        }
        for i in 0..EDGE_COUNT {
            inverse.eo[i] = (2 - self.eo[usize::from(inverse.ep[i])]) % 2;
        }
        inverse
    }

    /// A cube drawn uniformly from all reachable states.
    #[must_use]
    pub fn random(rng: &mut fastrand::Rng) -> Self {
        let mut cube = Self::SOLVED;
        cube.randomize(rng);
        cube
    }

    /// Replace self with a cube drawn uniformly from all reachable states.
    /// The generator is passed in so that concurrent callers never share one
    /// and seeded runs are reproducible.
    pub fn randomize(&mut self, rng: &mut fastrand::Rng) {
        *self = Self::SOLVED;
        rng.shuffle(&mut self.cp);
        rng.shuffle(&mut self.ep);
        // Swapping two edges is a bijection between the mismatched and the
        // matched parity halves, so this keeps the distribution uniform
        if self.corner_parity() != self.edge_parity() {
            self.ep.swap(0, 1);
        }

        let mut sum = 0;
        for co in &mut self.co[..CORNER_COUNT - 1] {
            *co = rng.u8(..3);
            sum += *co;
        }
        self.co[CORNER_COUNT - 1] = (3 - sum % 3) % 3;

        let mut sum = 0;
        for eo in &mut self.eo[..EDGE_COUNT - 1] {
            *eo = rng.u8(..2);
            sum += *eo;
        }
        self.eo[EDGE_COUNT - 1] = sum % 2;
    }
}
