#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]

use clap::{ArgAction, Parser, Subcommand};
use color_eyre::eyre::{WrapErr, eyre};
use env_logger::TimestampPrecision;
use itertools::Itertools;
use log::{LevelFilter, info, warn};
use rayon::prelude::*;
use twophase::{
    CubieCube, Solution, SolveError, Tables,
    moves::{format_moves, random_canonical_sequence},
    solve, solve_with_tables,
    solver::MAX_SOLUTION_LENGTH,
};

/// Solves the 3x3x3 cube with the two-phase algorithm
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Increase logging verbosity (can be repeated)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a cube given as 54 facelet labels in the order U R F D L B
    Solve {
        /// The facelet string, e.g. the solved cube is
        /// UUUUUUUUURRRRRRRRRFFFFFFFFFDDDDDDDDDLLLLLLLLLBBBBBBBBB
        facelets: String,
        /// 0 to search from scratch, 1 if the cube is already in the phase 2
        /// subgroup
        #[arg(short, long, default_value_t = 0)]
        phase: u8,
        /// How long to search for shorter solutions, in seconds
        #[arg(short, long, default_value_t = 1.0)]
        time: f64,
    },
    /// Print the facelet string of a random cube
    Scramble {
        /// Seed of the random number generator
        #[arg(short, long)]
        seed: Option<u64>,
        /// Scramble with this many random moves instead of picking a
        /// uniformly random state
        #[arg(short, long)]
        moves: Option<usize>,
    },
    /// Solve random cubes and print the distribution of solution lengths
    Stats {
        /// The number of random cubes
        #[arg(short = 'n', long, default_value_t = 100)]
        trials: u64,
        /// The time to spend on each cube, in seconds
        #[arg(short, long, default_value_t = 1.0)]
        time: f64,
        /// Seed of the first trial; trial `i` uses `seed + i`
        #[arg(short, long)]
        seed: Option<u64>,
        /// The number of trials to run at once (defaults to the number of
        /// cores)
        #[arg(short, long)]
        jobs: Option<usize>,
    },
}

/// The outcome of one random trial.
struct Trial {
    facelets: String,
    result: Result<Solution, SolveError>,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .format_timestamp(Some(TimestampPrecision::Millis))
        .init();

    match cli.command {
        Commands::Solve {
            facelets,
            phase,
            time,
        } => {
            let solution = solve(&facelets, phase, time)?;
            println!("{solution}");
        }
        Commands::Scramble { seed, moves } => {
            let seed = seed.unwrap_or_else(|| fastrand::u64(..));
            info!("Scrambling with seed {seed}");
            let mut rng = fastrand::Rng::with_seed(seed);
            if let Some(length) = moves {
                let moves = random_canonical_sequence(&mut rng, length);
                println!("{}", format_moves(&moves));
                println!("{}", CubieCube::SOLVED.apply_moves(moves));
            } else {
                println!("{}", CubieCube::random(&mut rng));
            }
        }
        Commands::Stats {
            trials,
            time,
            seed,
            jobs,
        } => run_stats(trials, time, seed, jobs)?,
    }

    Ok(())
}

fn run_stats(
    trials: u64,
    time: f64,
    seed: Option<u64>,
    jobs: Option<usize>,
) -> color_eyre::Result<()> {
    if trials == 0 {
        return Err(eyre!("At least one trial is required"));
    }
    if !(time.is_finite() && time > 0.0) {
        return Err(eyre!("The time per trial must be a positive number of seconds"));
    }
    let seed = seed.unwrap_or_else(|| fastrand::u64(..));
    info!("Running {trials} trials with seed {seed}");

    let tables = Tables::shared()?;
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs.unwrap_or(0))
        .build()
        .wrap_err("Failed to build the thread pool")?;

    let results: Vec<Trial> = pool.install(|| {
        (0..trials)
            .into_par_iter()
            .map(|trial| {
                let mut rng = fastrand::Rng::with_seed(seed.wrapping_add(trial));
                let facelets = CubieCube::random(&mut rng).to_string();
                let result = solve_with_tables(tables, &facelets, 0, time);
                Trial { facelets, result }
            })
            .collect()
    });

    let mut counts = [0_u64; MAX_SOLUTION_LENGTH + 1];
    let mut failures = 0_u64;
    for Trial { facelets, result } in &results {
        println!("{facelets}");
        match result {
            Ok(solution) => {
                println!("{solution}");
                counts[solution.len()] += 1;
            }
            Err(error) => {
                warn!("Trial on {facelets} failed: {error}");
                println!("{error}");
                failures += 1;
            }
        }
        println!();
    }

    let solved = trials - failures;
    if solved == 0 {
        return Err(eyre!("No trial found a solution within {time}s"));
    }
    let total: u64 = counts
        .iter()
        .enumerate()
        .map(|(length, &count)| length as u64 * count)
        .sum();
    println!("average {:.2} moves", total as f64 / solved as f64);
    println!(
        "{{{}}}",
        counts
            .iter()
            .enumerate()
            .map(|(length, count)| format!("{length}: {count}"))
            .join(", ")
    );
    if failures > 0 {
        println!("{failures} trials found no solution");
    }
    Ok(())
}
