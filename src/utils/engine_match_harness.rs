//! Minimal head-to-head strategy match harness for local testing.
//!
//! Runs two `Strategy` implementations against each other without UCI I/O,
//! with an optional seeded random opening prefix and a ticking clock.

use std::time::{Duration, Instant};

use log::info;
use rand::prelude::IndexedRandom;
use rand::{rngs::StdRng, Rng, SeedableRng};
use shakmaty::Color;

use crate::engines::engine_trait::Strategy;
use crate::engines::filler_engine::FillerEngine;
use crate::engines::time_management::{Clock, SearchLimit, TimeLeft};
use crate::errors::StrategyErrors;
use crate::game_state::board::Board;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    WhiteWinCheckmate,
    BlackWinCheckmate,
    WhiteWinOnTime,
    BlackWinOnTime,
    DrawStalemate,
    DrawInsufficientMaterial,
    DrawRepetition,
    DrawFiftyMoveRule,
    DrawMaxPlies,
}

impl MatchOutcome {
    pub fn winner(self) -> Option<Color> {
        match self {
            MatchOutcome::WhiteWinCheckmate | MatchOutcome::WhiteWinOnTime => Some(Color::White),
            MatchOutcome::BlackWinCheckmate | MatchOutcome::BlackWinOnTime => Some(Color::Black),
            _ => None,
        }
    }

    /// PGN-style result string, as reported to strategies on game over.
    pub fn result_str(self) -> &'static str {
        match self.winner() {
            Some(Color::White) => "1-0",
            Some(Color::Black) => "0-1",
            None => "1/2-1/2",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerId {
    Player1,
    Player2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesOutcome {
    PlayerWin {
        player: PlayerId,
        outcome: MatchOutcome,
    },
    Draw(MatchOutcome),
}

#[derive(Debug, Clone)]
pub struct MatchConfig {
    pub max_plies: u16,
    pub opening_min_plies: u8,
    pub opening_max_plies: u8,
    pub initial_time: Duration,
    pub increment: Duration,
    /// Handed to each side on its first move instead of the clock.
    pub first_move_limit: SearchLimit,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            max_plies: 300,
            opening_min_plies: 2,
            opening_max_plies: 8,
            initial_time: Duration::from_secs(180),
            increment: Duration::from_secs(2),
            first_move_limit: SearchLimit::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MatchResult {
    pub outcome: MatchOutcome,
    pub final_fen: String,
    pub opening_moves_uci: Vec<String>,
    pub played_moves_uci: Vec<String>,
    pub white_move_count: u32,
    pub black_move_count: u32,
    pub white_total_time_ns: u128,
    pub black_total_time_ns: u128,
    pub final_clock: Clock,
}

#[derive(Debug, Clone)]
pub struct MatchSeriesConfig {
    pub games: u16,
    pub base_seed: u64,
    pub per_game: MatchConfig,
    pub verbose: bool,
}

impl Default for MatchSeriesConfig {
    fn default() -> Self {
        Self {
            games: 9,
            base_seed: 0,
            per_game: MatchConfig::default(),
            verbose: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MatchSeriesStats {
    pub games: u16,
    pub player1_wins: u16,
    pub player2_wins: u16,
    pub draws: u16,
    pub outcomes: Vec<SeriesOutcome>,
    pub player1_moves: u32,
    pub player2_moves: u32,
    pub player1_total_time_ns: u128,
    pub player2_total_time_ns: u128,
    pub player1_avg_move_time_ms: f64,
    pub player2_avg_move_time_ms: f64,
}

impl MatchSeriesStats {
    pub fn report(&self) -> String {
        format!(
            "games={} player1_wins={} player2_wins={} draws={} p1_avg_ms={:.3} p2_avg_ms={:.3}",
            self.games,
            self.player1_wins,
            self.player2_wins,
            self.draws,
            self.player1_avg_move_time_ms,
            self.player2_avg_move_time_ms
        )
    }
}

/// Play a single seeded match. `white` moves first.
pub fn play_strategy_match(
    white: &mut dyn Strategy,
    black: &mut dyn Strategy,
    seed: u64,
    config: &MatchConfig,
) -> Result<MatchResult, StrategyErrors> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut board = Board::new_game();
    let opening_moves_uci = apply_seeded_random_opening(&mut board, &mut rng, config)?;
    play_from_board(board, white, black, opening_moves_uci, config)
}

/// Play a match from a caller-provided position, without a random opening.
pub fn play_strategy_match_from_board(
    board: Board,
    white: &mut dyn Strategy,
    black: &mut dyn Strategy,
    config: &MatchConfig,
) -> Result<MatchResult, StrategyErrors> {
    play_from_board(board, white, black, Vec::new(), config)
}

fn apply_seeded_random_opening(
    board: &mut Board,
    rng: &mut StdRng,
    config: &MatchConfig,
) -> Result<Vec<String>, StrategyErrors> {
    let min = config.opening_min_plies.min(config.opening_max_plies);
    let plies = rng.random_range(min..=config.opening_max_plies);
    let mut played = Vec::with_capacity(usize::from(plies));
    for _ in 0..plies {
        let legal = board.legal_moves();
        let Some(mv) = legal.as_slice().choose(rng) else {
            break;
        };
        played.push(board.uci(mv));
        board.push(mv);
    }
    Ok(played)
}

fn play_from_board<'a>(
    mut board: Board,
    white: &'a mut dyn Strategy,
    black: &'a mut dyn Strategy,
    opening_moves_uci: Vec<String>,
    config: &MatchConfig,
) -> Result<MatchResult, StrategyErrors> {
    let mut clock = Clock::new(config.initial_time, config.increment);
    let mut played_moves_uci = Vec::<String>::new();
    let mut white_move_count = 0u32;
    let mut black_move_count = 0u32;
    let mut white_total_time_ns = 0u128;
    let mut black_total_time_ns = 0u128;

    let mut outcome = MatchOutcome::DrawMaxPlies;
    for _ in 0..config.max_plies {
        if let Some(finished) = terminal_outcome(&board) {
            outcome = finished;
            break;
        }

        let mover = board.turn();
        let move_count = match mover {
            Color::White => white_move_count,
            Color::Black => black_move_count,
        };
        let strategy: &mut dyn Strategy = match mover {
            Color::White => &mut *white,
            Color::Black => &mut *black,
        };

        let started = Instant::now();
        let chosen = if move_count == 0 {
            strategy.search(&mut board, &TimeLeft::Limit(config.first_move_limit), false)?
        } else {
            strategy.search_with_ponder(
                &mut board,
                clock.wtime,
                clock.btime,
                clock.winc,
                clock.binc,
                false,
            )?
        };
        let elapsed = started.elapsed();

        match mover {
            Color::White => {
                white_move_count = white_move_count.saturating_add(1);
                white_total_time_ns = white_total_time_ns.saturating_add(elapsed.as_nanos());
            }
            Color::Black => {
                black_move_count = black_move_count.saturating_add(1);
                black_total_time_ns = black_total_time_ns.saturating_add(elapsed.as_nanos());
            }
        }

        if !board.is_legal(&chosen) {
            return Err(StrategyErrors::IllegalMoveReturned(board.uci(&chosen)));
        }
        if !clock.charge(mover, elapsed) {
            outcome = match mover {
                Color::White => MatchOutcome::BlackWinOnTime,
                Color::Black => MatchOutcome::WhiteWinOnTime,
            };
            break;
        }

        played_moves_uci.push(board.uci(&chosen));
        board.push(&chosen);
        let opponent: &mut dyn Strategy = match mover {
            Color::White => &mut *black,
            Color::Black => &mut *white,
        };
        FillerEngine::new(opponent).opponent_move(&chosen);
    }
    if outcome == MatchOutcome::DrawMaxPlies {
        if let Some(finished) = terminal_outcome(&board) {
            outcome = finished;
        }
    }

    FillerEngine::new(&mut *white).game_over(outcome.result_str());
    FillerEngine::new(&mut *black).game_over(outcome.result_str());

    Ok(MatchResult {
        outcome,
        final_fen: board.fen(),
        opening_moves_uci,
        played_moves_uci,
        white_move_count,
        black_move_count,
        white_total_time_ns,
        black_total_time_ns,
        final_clock: clock,
    })
}

fn terminal_outcome(board: &Board) -> Option<MatchOutcome> {
    if board.is_checkmate() {
        return Some(match board.turn() {
            Color::White => MatchOutcome::BlackWinCheckmate,
            Color::Black => MatchOutcome::WhiteWinCheckmate,
        });
    }
    if board.is_stalemate() {
        return Some(MatchOutcome::DrawStalemate);
    }
    if board.is_insufficient_material() {
        return Some(MatchOutcome::DrawInsufficientMaterial);
    }
    if board.halfmove_clock() >= 100 {
        return Some(MatchOutcome::DrawFiftyMoveRule);
    }
    if board.repetition_count() >= 3 {
        return Some(MatchOutcome::DrawRepetition);
    }
    None
}

/// Play a series of matches and aggregate win/loss/draw statistics.
///
/// Player colors are randomized each game (deterministic from `base_seed`).
pub fn play_strategy_match_series<F1, F2>(
    player1_factory: F1,
    player2_factory: F2,
    config: MatchSeriesConfig,
) -> Result<MatchSeriesStats, StrategyErrors>
where
    F1: Fn() -> Result<Box<dyn Strategy>, StrategyErrors>,
    F2: Fn() -> Result<Box<dyn Strategy>, StrategyErrors>,
{
    let mut stats = MatchSeriesStats {
        games: config.games,
        ..MatchSeriesStats::default()
    };
    let mut color_rng = StdRng::seed_from_u64(config.base_seed ^ 0xA5A5_5A5A_0123_4567);

    for i in 0..config.games {
        let player1_is_white = color_rng.random_bool(0.5);
        let seed = config.base_seed.wrapping_add(u64::from(i));
        if config.verbose {
            let (white, black) = if player1_is_white {
                ("Player1", "Player2")
            } else {
                ("Player2", "Player1")
            };
            info!(
                "[series] game {}/{} seed={} white={} black={}",
                i + 1,
                config.games,
                seed,
                white,
                black
            );
        }

        let mut player1 = player1_factory()?;
        let mut player2 = player2_factory()?;
        let result = if player1_is_white {
            play_strategy_match(player1.as_mut(), player2.as_mut(), seed, &config.per_game)
        } else {
            play_strategy_match(player2.as_mut(), player1.as_mut(), seed, &config.per_game)
        };
        player1.quit()?;
        player2.quit()?;
        let result = result?;

        let (p1_moves, p1_time, p2_moves, p2_time) = if player1_is_white {
            (
                result.white_move_count,
                result.white_total_time_ns,
                result.black_move_count,
                result.black_total_time_ns,
            )
        } else {
            (
                result.black_move_count,
                result.black_total_time_ns,
                result.white_move_count,
                result.white_total_time_ns,
            )
        };
        stats.player1_moves = stats.player1_moves.saturating_add(p1_moves);
        stats.player2_moves = stats.player2_moves.saturating_add(p2_moves);
        stats.player1_total_time_ns = stats.player1_total_time_ns.saturating_add(p1_time);
        stats.player2_total_time_ns = stats.player2_total_time_ns.saturating_add(p2_time);

        let player1_color = if player1_is_white {
            Color::White
        } else {
            Color::Black
        };
        let series_outcome = match result.outcome.winner() {
            Some(color) if color == player1_color => {
                stats.player1_wins += 1;
                SeriesOutcome::PlayerWin {
                    player: PlayerId::Player1,
                    outcome: result.outcome,
                }
            }
            Some(_) => {
                stats.player2_wins += 1;
                SeriesOutcome::PlayerWin {
                    player: PlayerId::Player2,
                    outcome: result.outcome,
                }
            }
            None => {
                stats.draws += 1;
                SeriesOutcome::Draw(result.outcome)
            }
        };
        if config.verbose {
            info!("[series] game {} result {:?}", i + 1, series_outcome);
        }
        stats.outcomes.push(series_outcome);
    }

    stats.player1_avg_move_time_ms = average_ms(stats.player1_total_time_ns, stats.player1_moves);
    stats.player2_avg_move_time_ms = average_ms(stats.player2_total_time_ns, stats.player2_moves);
    Ok(stats)
}

fn average_ms(total_ns: u128, moves: u32) -> f64 {
    if moves == 0 {
        0.0
    } else {
        total_ns as f64 / f64::from(moves) / 1_000_000.0
    }
}
