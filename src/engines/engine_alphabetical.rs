//! Alphabetical strategy.
//!
//! Deterministic and position-sensitive: renders every legal move in SAN and
//! plays the one that sorts first.

use shakmaty::Move;

use crate::engines::engine_trait::Strategy;
use crate::engines::time_management::TimeLeft;
use crate::errors::StrategyErrors;
use crate::game_state::board::Board;

/// Plays the legal move whose SAN sorts first.
///
/// SAN depends on the position (disambiguation, check suffixes), so the same
/// from/to pair can sort differently in different positions.
#[derive(Debug, Default)]
pub struct Alphabetical;

impl Alphabetical {
    pub fn new() -> Self {
        Self
    }
}

impl Strategy for Alphabetical {
    fn name(&self) -> &str {
        "Alphabetical"
    }

    fn search(
        &mut self,
        board: &mut Board,
        _time_left: &TimeLeft,
        _ponder: bool,
    ) -> Result<Move, StrategyErrors> {
        let mut keyed: Vec<(String, Move)> = board
            .legal_moves()
            .into_iter()
            .map(|mv| (board.san(&mv), mv))
            .collect();
        keyed.sort_by(|a, b| a.0.cmp(&b.0));
        keyed
            .into_iter()
            .next()
            .map(|(_, mv)| mv)
            .ok_or_else(|| StrategyErrors::NoLegalMoves(board.fen()))
    }
}

#[cfg(test)]
mod tests {
    use super::Alphabetical;
    use crate::engines::engine_trait::Strategy;
    use crate::engines::time_management::TimeLeft;
    use crate::game_state::board::Board;

    #[test]
    fn start_position_plays_knight_to_a3() {
        // Uppercase piece letters sort before lowercase pawn files.
        let mut board = Board::new_game();
        let mv = Alphabetical::new()
            .search(&mut board, &TimeLeft::default(), false)
            .expect("search should succeed");
        assert_eq!(board.san(&mv), "Na3");
    }

    #[test]
    fn is_deterministic() {
        let mut board = Board::from_fen(
            "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
        )
        .expect("fen should parse");
        let mut strategy = Alphabetical::new();
        let first = strategy
            .search(&mut board, &TimeLeft::default(), false)
            .expect("search should succeed");
        for _ in 0..5 {
            let again = strategy
                .search(&mut board, &TimeLeft::default(), true)
                .expect("search should succeed");
            assert_eq!(again, first);
        }
        assert!(board.legal_moves().contains(&first));
    }
}
