use std::time::{Duration, Instant};
use twophase::{
    CubieCube, SolveError, SolverError, Tables, TwoPhaseSolver,
    moves::{is_canonical, parse_moves, random_canonical_sequence},
    solve, solve_with_tables,
};

const SOLVED: &str = "UUUUUUUUURRRRRRRRRFFFFFFFFFDDDDDDDDDLLLLLLLLLBBBBBBBBB";
const SUPERFLIP: &str = "UBULURUFURURFRBRDRFUFLFRFDFDFDLDRDBDLULBLFLDLBUBRBLBDB";
const SCRAMBLED: &str = "FLLLULFRFRUURRRBBBLDDFFUBRUDFRDDUFLDUFUFLDLBRBDRBBULBD";

fn tables() -> &'static Tables {
    Tables::shared().unwrap()
}

#[test_log::test]
fn test_solve_solved() {
    let solution = solve(SOLVED, 0, 1.0).unwrap();
    assert!(solution.is_empty());
    assert!(solution.to_string().starts_with("(0f/"));
}

#[test_log::test]
fn test_solve_scrambled() {
    let solution = solve(SCRAMBLED, 0, 3.0).unwrap();
    let cube: CubieCube = SCRAMBLED.parse().unwrap();
    assert!(solution.len() <= 30);
    assert!(is_canonical(&solution.moves));
    assert!(cube.apply_moves(solution.moves.iter().copied()).is_solved());
    assert!(
        solution
            .to_string()
            .contains(&format!("({}f/", solution.len()))
    );
}

#[test_log::test]
fn test_superflip() {
    let cube: CubieCube = SUPERFLIP.parse().unwrap();
    assert_eq!(cube.edge_orientation(), &[1; 12]);
    let solution = solve_with_tables(tables(), SUPERFLIP, 0, 5.0).unwrap();
    assert!(cube.apply_moves(solution.moves).is_solved());
}

#[test_log::test]
fn test_near_optimal_on_short_scrambles() {
    let mut rng = fastrand::Rng::with_seed(2024);
    for length in 1..=6 {
        for _ in 0..4 {
            let scramble = random_canonical_sequence(&mut rng, length);
            let cube = CubieCube::SOLVED.apply_moves(scramble.iter().copied());
            let solution = solve_with_tables(tables(), &cube.to_string(), 0, 30.0).unwrap();
            assert!(solution.len() <= length, "{solution} for {scramble:?}");
            assert!(cube.apply_moves(solution.moves).is_solved());
        }
    }
}

#[test_log::test]
fn test_random_cubes_concurrently() {
    let handles: Vec<_> = (0..4)
        .map(|seed| {
            std::thread::spawn(move || {
                let mut rng = fastrand::Rng::with_seed(seed);
                let cube = CubieCube::random(&mut rng);
                let solution = TwoPhaseSolver::new(tables())
                    .with_time_limit(Duration::from_secs(10))
                    .with_max_solution_length(30)
                    .solve(&cube)
                    .unwrap();
                assert!(cube.apply_moves(solution.moves).is_solved());
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}

#[test_log::test]
fn test_more_time_is_never_worse() {
    let cube: CubieCube = SCRAMBLED.parse().unwrap();
    let first = TwoPhaseSolver::new(tables())
        .with_max_solution_length(30)
        .solve(&cube)
        .unwrap();
    let longer = TwoPhaseSolver::new(tables())
        .with_time_limit(Duration::from_secs(2))
        .solve(&cube)
        .unwrap();
    assert!(longer.len() <= first.len());
}

#[test_log::test]
fn test_phase2_start() {
    let cube = CubieCube::SOLVED.apply_moves(parse_moves("R2 U F2 D' B2 L2 U2").unwrap());
    let solution = solve_with_tables(tables(), &cube.to_string(), 1, 5.0).unwrap();
    assert!(solution.moves.iter().all(|move_| move_.is_phase2()));
    assert!(!solution.proven_optimal);
    assert!(cube.apply_moves(solution.moves).is_solved());

    assert_eq!(
        solve_with_tables(tables(), SCRAMBLED, 1, 5.0),
        Err(SolveError::Solver(SolverError::NotInPhase2Subgroup))
    );
}

#[test_log::test]
fn test_timeout() {
    let start = Instant::now();
    let error = solve_with_tables(tables(), SUPERFLIP, 0, 1e-9).unwrap_err();
    assert!(error.is_timeout());
    assert!(start.elapsed() < Duration::from_secs(1));
}

#[test]
fn test_contract_violations() {
    assert!(matches!(
        solve(SOLVED, 2, 1.0),
        Err(SolveError::InvalidStartPhase(_))
    ));
    for time in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        assert!(matches!(
            solve(SOLVED, 0, time),
            Err(SolveError::InvalidTimeLimit(_))
        ));
    }
    assert!(matches!(
        solve("UUU", 0, 1.0),
        Err(SolveError::InvalidState(_))
    ));
    let twisted = "UUUUUUUUFURRRRRRRRFFRFFFFFFDDDDDDDDDLLLLLLLLLBBBBBBBBB";
    assert!(matches!(
        solve(twisted, 0, 1.0),
        Err(SolveError::InvalidState(_))
    ));
}

#[test_log::test]
fn test_huge_time_limit() {
    for time in [1e20, f64::MAX] {
        let solution = solve(SOLVED, 0, time).unwrap();
        assert!(solution.is_empty());
    }
    let cube = CubieCube::SOLVED.apply_moves(parse_moves("R U F'").unwrap());
    let solution = solve_with_tables(tables(), &cube.to_string(), 0, 1e20).unwrap();
    assert_eq!(solution.len(), 3);
    assert!(solution.proven_optimal);
}
