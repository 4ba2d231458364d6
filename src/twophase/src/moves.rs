//! The 18 face turns of the cube and the canonical ordering that keeps the
//! search from exploring redundant permutations of commuting moves.

use crate::cubie::{BASIC_MOVE_CUBES, CubieCube};
use itertools::Itertools;
use std::{fmt, str::FromStr, sync::LazyLock};
use thiserror::Error;

/// The number of elementary moves.
pub const MOVE_COUNT: usize = 18;

/// The number of moves that generate the phase 2 subgroup.
pub const PHASE2_MOVE_COUNT: usize = 10;

/// A face of the cube. Also used as a sticker label, since every sticker is
/// named after the face whose centre carries its colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Face {
    U,
    R,
    F,
    D,
    L,
    B,
}

impl Face {
    pub const ALL: [Face; 6] = [Face::U, Face::R, Face::F, Face::D, Face::L, Face::B];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The face on the other side of the cube. Turns of opposite faces
    /// commute.
    #[must_use]
    pub const fn opposite(self) -> Face {
        Face::ALL[(self.index() + 3) % 6]
    }

    #[must_use]
    pub const fn label(self) -> char {
        match self {
            Face::U => 'U',
            Face::R => 'R',
            Face::F => 'F',
            Face::D => 'D',
            Face::L => 'L',
            Face::B => 'B',
        }
    }

    #[must_use]
    pub const fn from_label(label: char) -> Option<Face> {
        match label {
            'U' => Some(Face::U),
            'R' => Some(Face::R),
            'F' => Some(Face::F),
            'D' => Some(Face::D),
            'L' => Some(Face::L),
            'B' => Some(Face::B),
            _ => None,
        }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A clockwise turn of `face` by `turns` quarter turns, where three quarter
/// turns is the inverse quarter turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Move {
    face: Face,
    turns: u8,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Move index {index} is out of range, expected a value between 0 and {}", MOVE_COUNT - 1)]
pub struct MoveIndexError {
    pub index: usize,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseMoveError {
    #[error("Invalid move {0:?}, expected one of URFDLB optionally followed by 2 or '")]
    InvalidMove(String),
}

static MOVE_CUBES: LazyLock<[CubieCube; MOVE_COUNT]> = LazyLock::new(|| {
    let mut move_cubes = [CubieCube::SOLVED; MOVE_COUNT];
    for face in Face::ALL {
        let quarter_turn = &BASIC_MOVE_CUBES[face.index()];
        let mut acc = CubieCube::SOLVED;
        for turns in 0..3 {
            acc = acc.compose(quarter_turn);
            move_cubes[face.index() * 3 + turns] = acc;
        }
    }
    move_cubes
});

impl Move {
    /// Every move, ordered by face and then by the number of quarter turns.
    /// The search generates moves in exactly this order.
    pub const ALL: [Move; MOVE_COUNT] = {
        let mut moves = [Move {
            face: Face::U,
            turns: 1,
        }; MOVE_COUNT];
        let mut i = 0;
        while i < MOVE_COUNT {
            moves[i] = Move {
                face: Face::ALL[i / 3],
                turns: (i % 3) as u8 + 1,
            };
            i += 1;
        }
        moves
    };

    /// The generators of the phase 2 subgroup, in the same order as `ALL`.
    /// Phase 2 move tables use the position in this array as their column.
    pub const PHASE2: [Move; PHASE2_MOVE_COUNT] = {
        let mut moves = [Move {
            face: Face::U,
            turns: 1,
        }; PHASE2_MOVE_COUNT];
        let mut i = 0;
        let mut j = 0;
        while i < MOVE_COUNT {
            if Move::ALL[i].is_phase2() {
                moves[j] = Move::ALL[i];
                j += 1;
            }
            i += 1;
        }
        moves
    };

    /// Returns `None` unless `turns` is 1, 2 or 3.
    #[must_use]
    pub const fn new(face: Face, turns: u8) -> Option<Move> {
        if turns >= 1 && turns <= 3 {
            Some(Move { face, turns })
        } else {
            None
        }
    }

    /// Look up the move at `index` in the fixed move table.
    ///
    /// # Errors
    ///
    /// If `index` is not in `[0, 18)`.
    pub fn from_index(index: usize) -> Result<Move, MoveIndexError> {
        Move::ALL
            .get(index)
            .copied()
            .ok_or(MoveIndexError { index })
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.face.index() * 3 + self.turns as usize - 1
    }

    #[must_use]
    pub const fn face(self) -> Face {
        self.face
    }

    #[must_use]
    pub const fn turns(self) -> u8 {
        self.turns
    }

    #[must_use]
    pub const fn inverse(self) -> Move {
        Move {
            face: self.face,
            turns: 4 - self.turns,
        }
    }

    /// Whether the move preserves the phase 2 subgroup: any turn of U or D,
    /// or a half turn of a side face.
    #[must_use]
    pub const fn is_phase2(self) -> bool {
        matches!(self.face, Face::U | Face::D) || self.turns == 2
    }

    /// Whether `self` may directly follow `previous` in a canonical
    /// sequence. Two turns of the same face always collapse into one (or
    /// none), and turns of opposite faces commute, so only the order with the
    /// lower face index first is kept.
    #[must_use]
    pub const fn may_follow(self, previous: Move) -> bool {
        let face = self.face.index();
        let previous_face = previous.face.index();
        face != previous_face
            && !(self.face.opposite().index() == previous_face && face < previous_face)
    }

    /// The cube obtained by applying this move to the solved cube.
    #[must_use]
    pub fn cube(self) -> &'static CubieCube {
        &MOVE_CUBES[self.index()]
    }
}

impl TryFrom<usize> for Move {
    type Error = MoveIndexError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Move::from_index(index)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = match self.turns {
            1 => "",
            2 => "2",
            _ => "'",
        };
        write!(f, "{}{suffix}", self.face)
    }
}

impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseMoveError::InvalidMove(s.to_owned());
        let mut chars = s.chars();
        let face = chars.next().and_then(Face::from_label).ok_or_else(invalid)?;
        let turns = match chars.as_str() {
            "" | "1" => 1,
            "2" | "2'" => 2,
            "'" | "3" => 3,
            _ => return Err(invalid()),
        };
        Ok(Move { face, turns })
    }
}

/// Parse a whitespace separated move sequence such as `R U2 F'`.
///
/// # Errors
///
/// If any of the moves is not valid notation.
pub fn parse_moves(s: &str) -> Result<Vec<Move>, ParseMoveError> {
    s.split_whitespace().map(str::parse).collect()
}

/// Format a move sequence in standard notation, separated by spaces.
#[must_use]
pub fn format_moves(moves: &[Move]) -> String {
    moves.iter().join(" ")
}

/// Whether every adjacent pair in `moves` satisfies `Move::may_follow`.
#[must_use]
pub fn is_canonical(moves: &[Move]) -> bool {
    moves
        .iter()
        .tuple_windows()
        .all(|(&previous, &next)| next.may_follow(previous))
}

/// A random canonical move sequence of exactly `length` moves.
#[must_use]
pub fn random_canonical_sequence(rng: &mut fastrand::Rng, length: usize) -> Vec<Move> {
    let mut moves: Vec<Move> = Vec::with_capacity(length);
    while moves.len() < length {
        let candidate = Move::ALL[rng.usize(..MOVE_COUNT)];
        if moves.last().is_none_or(|&previous| candidate.may_follow(previous)) {
            moves.push(candidate);
        }
    }
    moves
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_indices_round_trip() {
        for (index, move_) in Move::ALL.into_iter().enumerate() {
            assert_eq!(move_.index(), index);
            assert_eq!(Move::from_index(index), Ok(move_));
        }
        assert_eq!(Move::from_index(18), Err(MoveIndexError { index: 18 }));
    }

    #[test]
    fn test_phase2_moves() {
        let names = Move::PHASE2.iter().join(" ");
        assert_eq!(names, "U U2 U' R2 F2 D D2 D' L2 B2");
    }

    #[test]
    fn test_notation() {
        let moves = parse_moves("R U2 F' D1 L3 B2'").unwrap();
        assert_eq!(format_moves(&moves), "R U2 F' D L' B2");
        assert!(parse_moves("R X").is_err());
        assert!(parse_moves("R4").is_err());
        assert!(parse_moves("").unwrap().is_empty());
    }

    #[test]
    fn test_move_orders() {
        for move_ in Move::ALL {
            let mut cube = CubieCube::SOLVED;
            for _ in 0..4 {
                cube = cube.apply(Move::new(move_.face(), 1).unwrap());
            }
            assert!(cube.is_solved());
            assert!(cube.apply(move_).apply(move_.inverse()).is_solved());
        }
    }

    #[test]
    fn test_canonical_prevents_same_face() {
        for a in Move::ALL {
            for b in Move::ALL {
                if a.face() == b.face() {
                    assert!(!a.may_follow(b));
                }
            }
        }
    }

    #[test]
    fn test_canonical_orders_commuting_faces() {
        for a in Move::ALL {
            for b in Move::ALL {
                if a.face() == b.face() {
                    continue;
                }
                let commutes = a.cube().compose(b.cube()) == b.cube().compose(a.cube());
                assert_eq!(commutes, a.face().opposite() == b.face());
                if commutes {
                    // A total ordering of commuting faces, so exactly one of
                    // the two orders survives.
                    assert!(a.may_follow(b) ^ b.may_follow(a));
                } else {
                    assert!(a.may_follow(b) && b.may_follow(a));
                }
            }
        }
    }

    #[test]
    fn test_random_canonical_sequence() {
        let mut rng = fastrand::Rng::with_seed(7);
        for length in 0..30 {
            let moves = random_canonical_sequence(&mut rng, length);
            assert_eq!(moves.len(), length);
            assert!(is_canonical(&moves));
        }
    }
}
