use twophase::{CubieCube, FaceletCube, InvalidStateError, Move, moves::parse_moves};

static SCRAMBLES: [[&str; 2]; 12] = [
    ["", "UUUUUUUUURRRRRRRRRFFFFFFFFFDDDDDDDDDLLLLLLLLLBBBBBBBBB"],
    [
        "U",
        "UUUUUUUUUBBBRRRRRRRRRFFFFFFDDDDDDDDDFFFLLLLLLLLLBBBBBB",
    ],
    [
        "U2 R2 L D2 L F2 B2 U' D' F U R' L2 U2 D L F' B2 D R2",
        "FLLLULFRFRUURRRBBBLDDFFUBRUDFRDDUFLDUFUFLDLBRBDRBBULBD",
    ],
    [
        "L U' R2 F B2 R2 L U' D2 R2 F B' U R' U2 R2 D2 F2 U2 L'",
        "BLBLUFFFFDULURFRRULDLBFRDBUFDFBDDDBRDUUFLULRRUDRLBRBLB",
    ],
    [
        "R L2 U2 D2 R2 U2 R' D2 R' F' R L2 B R2 L' F' B2 U' D' F B2 U R' L2",
        "DUULUFBDDRRFURDBFLRBBUFBLBLULURDLLBDFUUFLRBDFRFRLBDFRD",
    ],
    [
        "L2 U2 D' L2 U2 L2 F2 U2 D' F2 B2 L2 U B U2 D R2 U' F2 D R2 L'",
        "BULRUDFDDFLDRRRBFBLFRUFFFBLULUFDLLDRRDURLLBURFBUBBUDBD",
    ],
    [
        "U2 L D2 R2 U2 L F2 B2 D' R' L' F' B2 R' L2 F2 B' R U2 D F B2 R L'",
        "BRRRUBLRBDDFBRRUDRBDRLFLDLFLURDDFUFBLBUBLFLLFDUDFBUUUF",
    ],
    [
        "F U2 D2 R2 F' B2 D2 F B D2 L2 U2 D R F2 B' L' B R L U D2 R2 L'",
        "RFDUUDBFRFBFRRDBBUDRUDFBBDLLLULDUDLLUFRRLRRUDLLBFBUFBF",
    ],
    [
        "R2 D' B2 U' D' R2 U' L2 U' L2 B' R' F D F' B U2 L'",
        "BUDFUDRFDBRFURBFDRDULRFBUBURDLFDLRDDULFULBBRFLRLLBLBFU",
    ],
    [
        "L D2 R' L' D2 F' R' L' F B2 U' D F B' R' U2 L",
        "FRFDUDULRUBDFRBFFRLDBLFRDULRRDLDUBLULFBBLFDBBRDURBUFUL",
    ],
    [
        "U' R2 L2 F B R' F2 B2 D' F' R U R2 B2 R2 F2 U' R2 L2 U' D",
        "URFLUDULULFLDRRRLBRBBRFBRBDDUBDDULRDBFFFLFFLFDURBBULDU",
    ],
    [
        "R2 D2 B' D2 F B L2 U2 D2 F2 L' U D F' B R F R' L2 B",
        "RUURULDDRBFLFRRBLLLLDUFRRUUDBRDDBLRBFBFDLFUFFFLUDBBDUB",
    ],
];

#[test]
fn test_scrambles_match_facelets() {
    for [scramble, facelets] in SCRAMBLES {
        let cube = CubieCube::SOLVED.apply_moves(parse_moves(scramble).unwrap());
        assert_eq!(cube.to_string(), facelets, "{scramble}");
        assert_eq!(facelets.parse::<CubieCube>(), Ok(cube), "{scramble}");
    }
}

#[test]
fn test_multiply_matches_apply() {
    let mut rng = fastrand::Rng::with_seed(1);
    let mut a = CubieCube::random(&mut rng);
    let mut b = a;
    for _ in 0..100 {
        let index = rng.usize(..18);
        a = a.multiply(index).unwrap();
        b = b.apply(Move::from_index(index).unwrap());
        assert_eq!(a, b);
    }
    assert!(a.multiply(18).is_err());
}

#[test]
fn test_inverse_scramble_solves() {
    for [scramble, facelets] in SCRAMBLES {
        let moves = parse_moves(scramble).unwrap();
        let inverse = moves.iter().rev().map(|move_| move_.inverse());
        let cube: CubieCube = facelets.parse().unwrap();
        assert!(cube.apply_moves(inverse).is_solved());
    }
}

#[test]
fn test_quarter_turn_pieces() {
    let cube = CubieCube::SOLVED.apply_moves(parse_moves("R").unwrap());
    assert_eq!(cube.corner_permutation(), &[4, 1, 2, 0, 7, 5, 6, 3]);
    assert_eq!(cube.corner_orientation(), &[2, 0, 0, 1, 1, 0, 0, 2]);
    assert_eq!(
        cube.edge_permutation(),
        &[8, 1, 2, 3, 11, 5, 6, 7, 4, 9, 10, 0]
    );
    assert_eq!(cube.edge_orientation(), &[0; 12]);
    assert!(cube.corner_parity() && cube.edge_parity());
}

#[test]
fn test_randomize_is_seeded() {
    let mut a = CubieCube::SOLVED;
    let mut b = CubieCube::SOLVED;
    a.randomize(&mut fastrand::Rng::with_seed(99));
    b.randomize(&mut fastrand::Rng::with_seed(99));
    assert_eq!(a, b);
    assert!(a.verify().is_ok());
    let facelet_cube: FaceletCube = a.to_string().parse().unwrap();
    assert_eq!(facelet_cube.to_cubie_cube(), Ok(a));
}

#[test]
fn test_invalid_facelets() {
    assert_eq!(
        "".parse::<CubieCube>(),
        Err(InvalidStateError::InvalidLength { actual: 0 })
    );
    // ULB and UBR swapped without an edge swap
    let mut facelets: Vec<char> = SCRAMBLES[0][1].chars().collect();
    facelets.swap(36, 45);
    facelets.swap(47, 11);
    let facelets: String = facelets.into_iter().collect();
    assert_eq!(
        facelets.parse::<CubieCube>(),
        Err(InvalidStateError::ParityMismatch)
    );
}
