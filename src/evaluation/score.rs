//! Relative engine scores.

use std::cmp::Ordering;
use std::fmt;

/// Score reported by an evaluation oracle, relative to the side to move.
///
/// `Mate(n)` with `n > 0` means the side to move mates in `n`; `n < 0` means
/// it gets mated in `-n`; `Mate(0)` means it is already mated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Score {
    Cp(i32),
    Mate(i32),
}

impl Score {
    fn rank(&self) -> (i8, i64) {
        match *self {
            Score::Mate(n) if n > 0 => (2, -i64::from(n)),
            Score::Cp(cp) => (1, i64::from(cp)),
            Score::Mate(n) => (0, -i64::from(n)),
        }
    }
}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Score::Cp(cp) => write!(f, "cp {cp}"),
            Score::Mate(n) => write!(f, "mate {n}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Score;

    #[test]
    fn mates_bracket_centipawns() {
        let mut scores = vec![
            Score::Cp(30),
            Score::Mate(1),
            Score::Mate(-3),
            Score::Cp(-500),
            Score::Mate(0),
            Score::Mate(4),
            Score::Mate(-1),
        ];
        scores.sort();
        assert_eq!(
            scores,
            vec![
                Score::Mate(0),
                Score::Mate(-1),
                Score::Mate(-3),
                Score::Cp(-500),
                Score::Cp(30),
                Score::Mate(4),
                Score::Mate(1),
            ]
        );
    }
}
