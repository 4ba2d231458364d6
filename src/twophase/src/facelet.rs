//! The facelet level representation: the 54 stickers of the cube, in the
//! order `U1..U9 R1..R9 F1..F9 D1..D9 L1..L9 B1..B9`, each face read row by
//! row as it is seen when looking at that face (with U and D seen with F at
//! the bottom and top respectively).
//!
//! This is the textual format accepted by `solve`.

use crate::{
    cubie::{CORNER_COUNT, CubieCube, EDGE_COUNT, InvalidStateError},
    moves::Face,
};
use std::{fmt, str::FromStr};

pub const FACELET_COUNT: usize = 54;

/// Sticker positions of every corner slot, starting with the U or D sticker
/// and going clockwise.
const CORNER_FACELETS: [[usize; 3]; CORNER_COUNT] = [
    [8, 9, 20],
    [6, 18, 38],
    [0, 36, 47],
    [2, 45, 11],
    [29, 26, 15],
    [27, 44, 24],
    [33, 53, 42],
    [35, 17, 51],
];

/// Sticker positions of every edge slot. The first sticker is the reference
/// sticker for the flip.
const EDGE_FACELETS: [[usize; 2]; EDGE_COUNT] = [
    [5, 10],
    [7, 19],
    [3, 37],
    [1, 46],
    [32, 16],
    [28, 25],
    [30, 43],
    [34, 52],
    [23, 12],
    [21, 41],
    [50, 39],
    [48, 14],
];

const CORNER_COLORS: [[Face; 3]; CORNER_COUNT] = {
    use Face::{B, D, F, L, R, U};
    [
        [U, R, F],
        [U, F, L],
        [U, L, B],
        [U, B, R],
        [D, F, R],
        [D, L, F],
        [D, B, L],
        [D, R, B],
    ]
};

const EDGE_COLORS: [[Face; 2]; EDGE_COUNT] = {
    use Face::{B, D, F, L, R, U};
    [
        [U, R],
        [U, F],
        [U, L],
        [U, B],
        [D, R],
        [D, F],
        [D, L],
        [D, B],
        [F, R],
        [F, L],
        [B, L],
        [B, R],
    ]
};

/// The position of the centre sticker of `face`.
const fn center(face: Face) -> usize {
    face.index() * 9 + 4
}

/// A cube in facelet representation. Parsing checks the label multiset and
/// the centres; converting into a `CubieCube` checks everything else.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FaceletCube {
    facelets: [Face; FACELET_COUNT],
}

impl FaceletCube {
    pub const SOLVED: FaceletCube = {
        let mut facelets = [Face::U; FACELET_COUNT];
        let mut i = 0;
        while i < FACELET_COUNT {
            facelets[i] = Face::ALL[i / 9];
            i += 1;
        }
        FaceletCube { facelets }
    };

    /// Convert to the cubie representation, identifying every piece by its
    /// colours and checking the result.
    ///
    /// # Errors
    ///
    /// If the stickers do not describe a reachable state.
    pub fn to_cubie_cube(&self) -> Result<CubieCube, InvalidStateError> {
        let f = &self.facelets;
        let mut cube = CubieCube::SOLVED;

        for (slot, positions) in CORNER_FACELETS.iter().enumerate() {
            // The orientation is the position of the U or D sticker
            let ori = positions
                .iter()
                .position(|&position| matches!(f[position], Face::U | Face::D))
                .ok_or(InvalidStateError::InvalidCorner { slot })?;
            let color_1 = f[positions[(ori + 1) % 3]];
            let color_2 = f[positions[(ori + 2) % 3]];
            let corner = CORNER_COLORS
                .iter()
                .position(|colors| *colors == [f[positions[ori]], color_1, color_2])
                .ok_or(InvalidStateError::InvalidCorner { slot })?;
            cube.cp[slot] = corner as u8;
            cube.co[slot] = ori as u8;
        }

        for (slot, positions) in EDGE_FACELETS.iter().enumerate() {
            let stickers = [f[positions[0]], f[positions[1]]];
            let (edge, ori) = EDGE_COLORS
                .iter()
                .enumerate()
                .find_map(|(edge, colors)| {
                    if stickers == *colors {
                        Some((edge, 0))
                    } else if stickers == [colors[1], colors[0]] {
                        Some((edge, 1))
                    } else {
                        None
                    }
                })
                .ok_or(InvalidStateError::InvalidEdge { slot })?;
            cube.ep[slot] = edge as u8;
            cube.eo[slot] = ori;
        }

        cube.verify()?;
        Ok(cube)
    }
}

impl FromStr for FaceletCube {
    type Err = InvalidStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let actual = s.chars().count();
        if actual != FACELET_COUNT {
            return Err(InvalidStateError::InvalidLength { actual });
        }

        let mut facelets = [Face::U; FACELET_COUNT];
        let mut counts = [0; 6];
        for (position, label) in s.chars().enumerate() {
            let face =
                Face::from_label(label).ok_or(InvalidStateError::InvalidLabel { label, position })?;
            facelets[position] = face;
            counts[face.index()] += 1;
        }

        for (face, count) in Face::ALL.into_iter().zip(counts) {
            if count != 9 {
                return Err(InvalidStateError::InvalidLabelCount {
                    label: face.label(),
                    count,
                });
            }
        }

        for face in Face::ALL {
            let actual = facelets[center(face)];
            if actual != face {
                return Err(InvalidStateError::MisplacedCenter {
                    face: face.label(),
                    actual: actual.label(),
                });
            }
        }

        Ok(FaceletCube { facelets })
    }
}

impl fmt::Display for FaceletCube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for face in &self.facelets {
            write!(f, "{face}")?;
        }
        Ok(())
    }
}

impl TryFrom<&FaceletCube> for CubieCube {
    type Error = InvalidStateError;

    fn try_from(facelet_cube: &FaceletCube) -> Result<Self, Self::Error> {
        facelet_cube.to_cubie_cube()
    }
}

impl FromStr for CubieCube {
    type Err = InvalidStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<FaceletCube>()?.to_cubie_cube()
    }
}

impl CubieCube {
    /// Paint the stickers of every piece according to its slot and
    /// orientation.
    #[must_use]
    pub fn to_facelet_cube(&self) -> FaceletCube {
        let mut facelets = FaceletCube::SOLVED.facelets;
        for slot in 0..CORNER_COUNT {
            let corner = usize::from(self.cp[slot]);
            let ori = usize::from(self.co[slot]);
            for k in 0..3 {
                facelets[CORNER_FACELETS[slot][(k + ori) % 3]] = CORNER_COLORS[corner][k];
            }
        }
        for slot in 0..EDGE_COUNT {
            let edge = usize::from(self.ep[slot]);
            let ori = usize::from(self.eo[slot]);
            for k in 0..2 {
                facelets[EDGE_FACELETS[slot][(k + ori) % 2]] = EDGE_COLORS[edge][k];
            }
        }
        FaceletCube { facelets }
    }
}

impl fmt::Display for CubieCube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_facelet_cube())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::{Move, parse_moves, random_canonical_sequence};

    const SOLVED: &str = "UUUUUUUUURRRRRRRRRFFFFFFFFFDDDDDDDDDLLLLLLLLLBBBBBBBBB";

    #[test]
    fn test_solved() {
        assert_eq!(FaceletCube::SOLVED.to_string(), SOLVED);
        assert_eq!(CubieCube::SOLVED.to_facelet_cube(), FaceletCube::SOLVED);
        assert_eq!(SOLVED.parse::<CubieCube>(), Ok(CubieCube::SOLVED));
    }

    #[test]
    fn test_single_moves() {
        let cube = CubieCube::SOLVED.apply("U".parse::<Move>().unwrap());
        assert_eq!(
            cube.to_string(),
            "UUUUUUUUUBBBRRRRRRRRRFFFFFFDDDDDDDDDFFFLLLLLLLLLBBBBBB"
        );
        let cube = CubieCube::SOLVED.apply_moves(parse_moves("R").unwrap());
        assert_eq!(
            cube.to_string(),
            "UUFUUFUUFRRRRRRRRRFFDFFDFFDDDBDDBDDBLLLLLLLLLUBBUBBUBB"
        );
    }

    #[test]
    fn test_round_trip() {
        let mut rng = fastrand::Rng::with_seed(10);
        for length in 0..40 {
            let moves = random_canonical_sequence(&mut rng, length);
            let cube = CubieCube::SOLVED.apply_moves(moves);
            let facelet_cube = cube.to_facelet_cube();
            let parsed: FaceletCube = facelet_cube.to_string().parse().unwrap();
            assert_eq!(parsed, facelet_cube);
            assert_eq!(parsed.to_cubie_cube(), Ok(cube));
        }
        for _ in 0..200 {
            let cube = CubieCube::random(&mut rng);
            assert_eq!(cube.to_string().parse::<CubieCube>(), Ok(cube));
        }
    }

    #[test]
    fn test_rejects_bad_labels() {
        assert_eq!(
            "UUU".parse::<FaceletCube>(),
            Err(InvalidStateError::InvalidLength { actual: 3 })
        );
        let mut s = SOLVED.to_owned();
        s.replace_range(0..1, "X");
        assert_eq!(
            s.parse::<FaceletCube>(),
            Err(InvalidStateError::InvalidLabel {
                label: 'X',
                position: 0
            })
        );
        s.replace_range(0..1, "R");
        assert_eq!(
            s.parse::<FaceletCube>(),
            Err(InvalidStateError::InvalidLabelCount {
                label: 'U',
                count: 8
            })
        );
    }

    #[test]
    fn test_rejects_misplaced_center() {
        // Swap the U and R centres; every label still occurs 9 times
        let mut s = SOLVED.to_owned();
        s.replace_range(4..5, "R");
        s.replace_range(13..14, "U");
        assert_eq!(
            s.parse::<FaceletCube>(),
            Err(InvalidStateError::MisplacedCenter {
                face: 'U',
                actual: 'R'
            })
        );
    }

    #[test]
    fn test_rejects_unreachable_states() {
        // Twist the URF corner in place
        let mut s: Vec<char> = SOLVED.chars().collect();
        let [a, b, c] = CORNER_FACELETS[0];
        (s[a], s[b], s[c]) = (s[c], s[a], s[b]);
        let s: String = s.into_iter().collect();
        assert!(matches!(
            s.parse::<CubieCube>(),
            Err(InvalidStateError::CornerTwist { .. })
        ));

        // Flip the UR edge in place
        let mut s: Vec<char> = SOLVED.chars().collect();
        let [a, b] = EDGE_FACELETS[0];
        s.swap(a, b);
        let s: String = s.into_iter().collect();
        assert!(matches!(
            s.parse::<CubieCube>(),
            Err(InvalidStateError::EdgeFlip { .. })
        ));

        // Swap the UR and UF edges
        let mut s: Vec<char> = SOLVED.chars().collect();
        let ([a1, b1], [a2, b2]) = (EDGE_FACELETS[0], EDGE_FACELETS[1]);
        (s[a1], s[a2]) = (s[a2], s[a1]);
        (s[b1], s[b2]) = (s[b2], s[b1]);
        let s: String = s.into_iter().collect();
        assert_eq!(s.parse::<CubieCube>(), Err(InvalidStateError::ParityMismatch));

        // Two stickers of the same colour on one corner
        let mut s: Vec<char> = SOLVED.chars().collect();
        s.swap(CORNER_FACELETS[0][1], EDGE_FACELETS[0][0]);
        let s: String = s.into_iter().collect();
        assert!(matches!(
            s.parse::<CubieCube>(),
            Err(InvalidStateError::InvalidCorner { slot: 0 })
        ));
    }
}
