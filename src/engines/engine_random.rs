//! Random-move strategy.
//!
//! Selects uniformly from legal moves. Useful as a sparring partner and for
//! exercising drivers end to end.

use rand::prelude::IndexedRandom;
use rand::rngs::StdRng;
use rand::SeedableRng;
use shakmaty::Move;

use crate::engines::engine_trait::Strategy;
use crate::engines::time_management::TimeLeft;
use crate::errors::StrategyErrors;
use crate::game_state::board::Board;

pub struct RandomMove {
    rng: StdRng,
}

impl RandomMove {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible move sequence for tests and seeded matches.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomMove {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for RandomMove {
    fn name(&self) -> &str {
        "RandomMove"
    }

    fn search(
        &mut self,
        board: &mut Board,
        _time_left: &TimeLeft,
        _ponder: bool,
    ) -> Result<Move, StrategyErrors> {
        let legal_moves = board.legal_moves();
        legal_moves
            .as_slice()
            .choose(&mut self.rng)
            .cloned()
            .ok_or_else(|| StrategyErrors::NoLegalMoves(board.fen()))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::RandomMove;
    use crate::engines::engine_trait::Strategy;
    use crate::engines::time_management::TimeLeft;
    use crate::errors::StrategyErrors;
    use crate::game_state::board::Board;

    #[test]
    fn every_legal_move_gets_picked_eventually() {
        // Lone kings: White has exactly a2, b1 and b2.
        let mut board = Board::from_fen("7k/8/8/8/8/8/8/K7 w - - 0 1").expect("fen should parse");
        let legal = board.legal_moves();
        assert_eq!(legal.len(), 3);

        let mut strategy = RandomMove::with_seed(11);
        let mut counts = HashMap::new();
        for _ in 0..600 {
            let mv = strategy
                .search(&mut board, &TimeLeft::default(), false)
                .expect("search should succeed");
            assert!(legal.contains(&mv));
            *counts.entry(board.uci(&mv)).or_insert(0usize) += 1;
        }

        assert_eq!(counts.len(), 3);
        assert!(counts.values().all(|&c| c > 100));
    }

    #[test]
    fn same_seed_same_choices() {
        let mut board = Board::new_game();
        let mut a = RandomMove::with_seed(42);
        let mut b = RandomMove::with_seed(42);
        for _ in 0..10 {
            let ma = a
                .search(&mut board, &TimeLeft::default(), false)
                .expect("search should succeed");
            let mb = b
                .search(&mut board, &TimeLeft::default(), false)
                .expect("search should succeed");
            assert_eq!(ma, mb);
        }
    }

    #[test]
    fn no_legal_moves_is_an_error() {
        // Fool's mate: White is checkmated.
        let mut board =
            Board::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
                .expect("fen should parse");
        let result = RandomMove::with_seed(1).search(&mut board, &TimeLeft::default(), false);
        assert!(matches!(result, Err(StrategyErrors::NoLegalMoves(_))));
    }
}
