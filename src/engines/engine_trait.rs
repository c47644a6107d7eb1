//! Strategy abstraction shared by every example bot.
//!
//! A strategy only has to implement `search`. Drivers call
//! `search_with_ponder` once per turn with the raw clock, report events
//! through `notify`, and release resources with `quit`.

use std::time::Duration;

use shakmaty::{Color, Move};

use crate::engines::time_management::TimeLeft;
use crate::errors::StrategyErrors;
use crate::game_state::board::Board;

/// Events an outer driver may report to a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent<'a> {
    NewGame,
    Configure { name: &'a str, value: &'a str },
    Ping,
    OpponentMove(&'a Move),
    Info(&'a str),
    GameOver(&'a str),
    Quit,
}

impl EngineEvent<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            EngineEvent::NewGame => "new_game",
            EngineEvent::Configure { .. } => "configure",
            EngineEvent::Ping => "ping",
            EngineEvent::OpponentMove(_) => "opponent_move",
            EngineEvent::Info(_) => "info",
            EngineEvent::GameOver(_) => "game_over",
            EngineEvent::Quit => "quit",
        }
    }
}

pub trait Strategy: Send {
    fn name(&self) -> &str;

    /// Choose a move from `board`'s legal-move set.
    ///
    /// `board` may be pushed and popped during the search but must be left
    /// exactly as it was received.
    fn search(
        &mut self,
        board: &mut Board,
        time_left: &TimeLeft,
        ponder: bool,
    ) -> Result<Move, StrategyErrors>;

    /// Pick the mover's remaining time and delegate to `search`.
    ///
    /// Increments are accepted for driver compatibility but not used.
    fn search_with_ponder(
        &mut self,
        board: &mut Board,
        wtime: Duration,
        btime: Duration,
        _winc: Duration,
        _binc: Duration,
        ponder: bool,
    ) -> Result<Move, StrategyErrors> {
        let time_left = match board.turn() {
            Color::White => wtime,
            Color::Black => btime,
        };
        self.search(board, &TimeLeft::Clock(time_left), ponder)
    }

    fn notify(&mut self, _event: &EngineEvent<'_>) {}

    fn quit(&mut self) -> Result<(), StrategyErrors> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use shakmaty::Move;

    use super::{EngineEvent, Strategy};
    use crate::engines::time_management::TimeLeft;
    use crate::errors::StrategyErrors;
    use crate::game_state::board::Board;

    #[derive(Default)]
    struct RecordingStrategy {
        seen: Vec<TimeLeft>,
    }

    impl Strategy for RecordingStrategy {
        fn name(&self) -> &str {
            "Recording"
        }

        fn search(
            &mut self,
            board: &mut Board,
            time_left: &TimeLeft,
            _ponder: bool,
        ) -> Result<Move, StrategyErrors> {
            self.seen.push(*time_left);
            board
                .legal_moves()
                .into_iter()
                .next()
                .ok_or_else(|| StrategyErrors::NoLegalMoves(board.fen()))
        }
    }

    #[test]
    fn search_with_ponder_uses_white_clock_for_white() {
        let mut strategy = RecordingStrategy::default();
        let mut board = Board::new_game();
        strategy
            .search_with_ponder(
                &mut board,
                Duration::from_secs(90),
                Duration::from_secs(30),
                Duration::from_secs(2),
                Duration::from_secs(3),
                false,
            )
            .expect("search should succeed");
        assert_eq!(strategy.seen, vec![TimeLeft::Clock(Duration::from_secs(90))]);
    }

    #[test]
    fn search_with_ponder_uses_black_clock_for_black() {
        let mut strategy = RecordingStrategy::default();
        let mut board = Board::new_game();
        board.push_uci("e2e4").expect("e2e4 should be legal");
        strategy
            .search_with_ponder(
                &mut board,
                Duration::from_secs(90),
                Duration::from_secs(30),
                Duration::ZERO,
                Duration::ZERO,
                true,
            )
            .expect("search should succeed");
        assert_eq!(strategy.seen, vec![TimeLeft::Clock(Duration::from_secs(30))]);
    }

    #[test]
    fn default_notify_and_quit_are_silent() {
        let mut strategy = RecordingStrategy::default();
        strategy.notify(&EngineEvent::Info("depth 1"));
        strategy.notify(&EngineEvent::GameOver("1-0"));
        strategy.quit().expect("default quit is a no-op");
        strategy.quit().expect("default quit is a no-op");
    }
}
