//! Evaluation oracle abstraction.
//!
//! An evaluator scores a position within a time limit. Strategies own their
//! evaluator exclusively and call it strictly sequentially, so the trait takes
//! `&mut self` and needs no interior locking.

use std::time::Duration;

use crate::errors::StrategyErrors;
use crate::evaluation::score::Score;
use crate::game_state::board::Board;

pub trait Evaluator: Send {
    /// Score `board` relative to its side to move, spending about `time_limit`.
    fn evaluate(&mut self, board: &Board, time_limit: Duration) -> Result<Score, StrategyErrors>;

    /// Release the underlying resource. Calls after the first are no-ops.
    fn close(&mut self) -> Result<(), StrategyErrors> {
        Ok(())
    }
}

/// Extract the score from a UCI `info` line, ignoring bound markers.
pub fn parse_info_score(line: &str) -> Option<Score> {
    let mut tokens = line.split_whitespace();
    if tokens.next()? != "info" {
        return None;
    }
    while let Some(tok) = tokens.next() {
        if tok == "score" {
            let kind = tokens.next()?;
            let value = tokens.next()?.parse::<i32>().ok()?;
            return match kind {
                "cp" => Some(Score::Cp(value)),
                "mate" => Some(Score::Mate(value)),
                _ => None,
            };
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::parse_info_score;
    use crate::evaluation::score::Score;

    #[test]
    fn parses_centipawn_and_mate_scores() {
        assert_eq!(
            parse_info_score(
                "info depth 12 seldepth 18 multipv 1 score cp -37 nodes 91234 nps 1000000 pv e7e5"
            ),
            Some(Score::Cp(-37))
        );
        assert_eq!(
            parse_info_score("info depth 5 score mate 3 nodes 100 pv d1h5"),
            Some(Score::Mate(3))
        );
        assert_eq!(
            parse_info_score("info depth 0 score mate 0"),
            Some(Score::Mate(0))
        );
    }

    #[test]
    fn ignores_bound_markers() {
        assert_eq!(
            parse_info_score("info depth 9 score cp 41 lowerbound nodes 5000"),
            Some(Score::Cp(41))
        );
    }

    #[test]
    fn non_score_lines_yield_none() {
        assert_eq!(parse_info_score("info string NNUE evaluation enabled"), None);
        assert_eq!(parse_info_score("bestmove e2e4 ponder e7e5"), None);
        assert_eq!(parse_info_score("info currmove e2e4 currmovenumber 1"), None);
        assert_eq!(parse_info_score("info depth 3 score wdl 1 2 3"), None);
    }
}
