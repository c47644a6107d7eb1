//! First-move strategy: lowest coordinate-notation move.

use shakmaty::Move;

use crate::engines::engine_trait::Strategy;
use crate::engines::time_management::TimeLeft;
use crate::errors::StrategyErrors;
use crate::game_state::board::Board;

/// Plays the legal move whose coordinate notation sorts first.
#[derive(Debug, Default)]
pub struct FirstMove;

impl FirstMove {
    pub fn new() -> Self {
        Self
    }
}

impl Strategy for FirstMove {
    fn name(&self) -> &str {
        "FirstMove"
    }

    fn search(
        &mut self,
        board: &mut Board,
        _time_left: &TimeLeft,
        _ponder: bool,
    ) -> Result<Move, StrategyErrors> {
        board
            .legal_moves()
            .into_iter()
            .min_by(|a, b| board.uci(a).cmp(&board.uci(b)))
            .ok_or_else(|| StrategyErrors::NoLegalMoves(board.fen()))
    }
}
