//! Standalone strategy-vs-strategy series runner.
//!
//! Run with:
//! `cargo run --release --bin strategy_match_series -- RandomMove Alphabetical`
//! `cargo run --release --bin strategy_match_series -- Anarchy FirstMove --games 4 --verbose`
//! `cargo run --release --bin strategy_match_series -- Anarchy RandomMove --book my_book.tsv`

use std::path::PathBuf;
use std::process::ExitCode;

use env_logger::Env;
use log::error;

use homemade_strategies::engines::engine_anarchy::AnarchyConfig;
use homemade_strategies::engines::strategy_factory::{build_strategy, StrategyKind};
use homemade_strategies::errors::StrategyErrors;
use homemade_strategies::tables::opening_book::OpeningBook;
use homemade_strategies::utils::engine_match_harness::{
    play_strategy_match_series, MatchConfig, MatchSeriesConfig,
};

struct Args {
    player1: StrategyKind,
    player2: StrategyKind,
    games: u16,
    seed: u64,
    book: Option<PathBuf>,
    verbose: bool,
}

fn parse_args() -> Result<Args, StrategyErrors> {
    let mut names = Vec::new();
    let mut games = 10u16;
    let mut seed = 1234u64;
    let mut book = None;
    let mut verbose = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--verbose" | "-v" => verbose = true,
            "--book" => book = args.next().map(PathBuf::from),
            "--games" | "--seed" => {
                let value = args.next().unwrap_or_default();
                let invalid = || StrategyErrors::InvalidOption {
                    name: arg.clone(),
                    value: value.clone(),
                };
                if arg == "--games" {
                    games = value.parse().map_err(|_| invalid())?;
                } else {
                    seed = value.parse().map_err(|_| invalid())?;
                }
            }
            _ => names.push(arg),
        }
    }

    let player1 = names
        .first()
        .map_or(Ok(StrategyKind::RandomMove), |name| name.parse())?;
    let player2 = names
        .get(1)
        .map_or(Ok(StrategyKind::Alphabetical), |name| name.parse())?;
    Ok(Args {
        player1,
        player2,
        games,
        seed,
        book,
        verbose,
    })
}

fn run() -> Result<(), StrategyErrors> {
    let args = parse_args()?;
    let mut anarchy = AnarchyConfig::from_env();
    if let Some(path) = &args.book {
        anarchy.opening_book.extend(OpeningBook::from_tsv_path(path)?);
    }

    let stats = play_strategy_match_series(
        || build_strategy(args.player1, &anarchy),
        || build_strategy(args.player2, &anarchy),
        MatchSeriesConfig {
            games: args.games,
            base_seed: args.seed,
            per_game: MatchConfig {
                max_plies: 200,
                opening_min_plies: 2,
                opening_max_plies: 6,
                ..MatchConfig::default()
            },
            verbose: args.verbose,
        },
    )?;

    println!("player1={} player2={}", args.player1, args.player2);
    println!("{}", stats.report());
    println!("outcomes: {:?}", stats.outcomes);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
