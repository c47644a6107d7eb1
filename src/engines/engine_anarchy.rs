//! Rule-augmented one-ply strategy.
//!
//! Before any scoring, a handful of house rules can force a move: en passant
//! is always taken, a fixed Ruy Lopez opening is played, and the king walks to
//! e2/e7 whenever it can. Otherwise every candidate except rook moves to a4 is
//! played on the board, scored by an evaluation oracle from the opponent's
//! point of view, and the candidate leaving the opponent worst off wins.

use std::path::PathBuf;
use std::time::Duration;

use log::{debug, info, warn};
use shakmaty::Move;

use crate::engines::engine_trait::Strategy;
use crate::engines::time_management::{
    per_candidate_budget, TimeLeft, DEFAULT_BASE_SEARCH_TIME, DEFAULT_SAFETY_MARGIN,
    DEFAULT_TURN_FRACTION,
};
use crate::errors::StrategyErrors;
use crate::evaluation::evaluator::Evaluator;
use crate::evaluation::score::Score;
use crate::evaluation::uci_evaluator::UciEvaluator;
use crate::game_state::board::Board;
use crate::tables::opening_book::OpeningBook;

const FORCED_KING_MOVES: [&str; 4] = ["Ke2", "Ke7", "Kxe2", "Kxe7"];

pub const DEFAULT_EVALUATOR_PATH: &str = "stockfish";
pub const EVALUATOR_PATH_ENV: &str = "STOCKFISH_PATH";

#[derive(Debug, Clone)]
pub struct AnarchyConfig {
    pub evaluator_path: PathBuf,
    pub base_search_time: Duration,
    pub turn_fraction: u32,
    pub safety_margin: Duration,
    pub opening_book: OpeningBook,
}

impl Default for AnarchyConfig {
    fn default() -> Self {
        Self {
            evaluator_path: PathBuf::from(DEFAULT_EVALUATOR_PATH),
            base_search_time: DEFAULT_BASE_SEARCH_TIME,
            turn_fraction: DEFAULT_TURN_FRACTION,
            safety_margin: DEFAULT_SAFETY_MARGIN,
            opening_book: OpeningBook::anarchy(),
        }
    }
}

impl AnarchyConfig {
    /// Defaults, with the evaluator path taken from `STOCKFISH_PATH` if set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(path) = std::env::var_os(EVALUATOR_PATH_ENV) {
            config.evaluator_path = PathBuf::from(path);
        }
        config
    }
}

/// SAN of a rook move landing on a4.
fn is_banned(san: &str) -> bool {
    san.starts_with('R') && san.ends_with("a4")
}

pub struct Anarchy<E: Evaluator = UciEvaluator> {
    evaluator: Option<E>,
    config: AnarchyConfig,
}

impl Anarchy<UciEvaluator> {
    /// Start the evaluator process named by `config.evaluator_path`.
    pub fn spawn(config: AnarchyConfig) -> Result<Self, StrategyErrors> {
        let evaluator = UciEvaluator::spawn(&config.evaluator_path)?;
        Ok(Self::with_evaluator(evaluator, config))
    }
}

impl<E: Evaluator> Anarchy<E> {
    pub fn with_evaluator(evaluator: E, config: AnarchyConfig) -> Self {
        Self {
            evaluator: Some(evaluator),
            config,
        }
    }

    /// `None` once `quit` has released the evaluator.
    pub fn evaluator(&self) -> Option<&E> {
        self.evaluator.as_ref()
    }

    /// Score `board` for its side to move, shaving the safety margin off the
    /// budget so oracle overhead stays inside it.
    pub fn evaluate(&mut self, board: &Board, search_time: Duration) -> Result<Score, StrategyErrors> {
        let time_limit = search_time.saturating_sub(self.config.safety_margin);
        self.evaluator
            .as_mut()
            .ok_or(StrategyErrors::EvaluatorShutDown)?
            .evaluate(board, time_limit)
    }

    /// First candidate, in enumeration order, that a house rule forces.
    fn forced_move(&self, board: &Board, legal_moves: &[Move]) -> Option<Move> {
        let book_reply = self.config.opening_book.reply_for(board).and_then(|uci| {
            match board.parse_uci(uci) {
                Ok(mv) => Some(mv),
                Err(_) => {
                    warn!("book reply {uci} is not legal in {}", board.fen());
                    None
                }
            }
        });

        for mv in legal_moves {
            if board.is_en_passant(mv) {
                info!("en passant is forced");
                return Some(mv.clone());
            }
            if let Some(reply) = &book_reply {
                info!("{} best by test", board.uci(reply));
                return Some(reply.clone());
            }
            let san = board.san(mv);
            if FORCED_KING_MOVES.contains(&san.as_str()) {
                info!("always play the bongcloud: {san}");
                return Some(mv.clone());
            }
        }
        None
    }
}

impl<E: Evaluator> Strategy for Anarchy<E> {
    fn name(&self) -> &str {
        "Anarchy"
    }

    fn search(
        &mut self,
        board: &mut Board,
        time_left: &TimeLeft,
        _ponder: bool,
    ) -> Result<Move, StrategyErrors> {
        if self.evaluator.is_none() {
            return Err(StrategyErrors::EvaluatorShutDown);
        }

        let legal_moves = board.legal_moves();
        if legal_moves.is_empty() {
            return Err(StrategyErrors::NoLegalMoves(board.fen()));
        }

        if let Some(forced) = self.forced_move(board, &legal_moves) {
            return Ok(forced);
        }

        let search_time = per_candidate_budget(
            time_left,
            legal_moves.len(),
            self.config.base_search_time,
            self.config.turn_fraction,
        );
        debug!(
            "scoring {} candidates at {:?} each",
            legal_moves.len(),
            search_time
        );

        let mut best: Option<(Score, Move)> = None;
        for mv in legal_moves {
            let san = board.san(&mv);
            if is_banned(&san) {
                info!("I saw {san}, I just didn't like it");
                continue;
            }

            board.push(&mv);
            let evaluation = self.evaluate(board, search_time);
            board.pop()?;
            let evaluation = evaluation?;

            debug!("{san}: opponent {evaluation}");
            if best.as_ref().map_or(true, |(best_eval, _)| evaluation < *best_eval) {
                best = Some((evaluation, mv));
            }
        }

        best.map(|(_, mv)| mv)
            .ok_or_else(|| StrategyErrors::NoEligibleMove(board.fen()))
    }

    fn quit(&mut self) -> Result<(), StrategyErrors> {
        match self.evaluator.take() {
            Some(mut evaluator) => evaluator.close(),
            None => Ok(()),
        }
    }
}
