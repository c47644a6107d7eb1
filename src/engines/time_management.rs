//! Clock handling and per-candidate time budgeting.
//!
//! Drivers pass raw clock data (`wtime/btime/winc/binc`); strategies receive
//! either the mover's remaining time or, on the first move of a game, an
//! engine-style search limit which is never divided.

use std::time::Duration;

use shakmaty::Color;

/// Base time spent scoring one candidate move.
pub const DEFAULT_BASE_SEARCH_TIME: Duration = Duration::from_millis(100);
/// A full candidate scan may use at most `1 / DEFAULT_TURN_FRACTION` of the clock.
pub const DEFAULT_TURN_FRACTION: u32 = 10;
/// Subtracted from every oracle query to absorb process overhead.
pub const DEFAULT_SAFETY_MARGIN: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Clock {
    pub wtime: Duration,
    pub btime: Duration,
    pub winc: Duration,
    pub binc: Duration,
}

impl Clock {
    pub fn new(initial: Duration, increment: Duration) -> Self {
        Self {
            wtime: initial,
            btime: initial,
            winc: increment,
            binc: increment,
        }
    }

    pub fn remaining_for(&self, color: Color) -> Duration {
        match color {
            Color::White => self.wtime,
            Color::Black => self.btime,
        }
    }

    pub fn increment_for(&self, color: Color) -> Duration {
        match color {
            Color::White => self.winc,
            Color::Black => self.binc,
        }
    }

    /// Charge `elapsed` to `color` and credit its increment.
    ///
    /// Returns `false` when the flag fell during the move.
    pub fn charge(&mut self, color: Color, elapsed: Duration) -> bool {
        let left = self.remaining_for(color);
        let flag_fell = elapsed > left;
        let updated = if flag_fell {
            Duration::ZERO
        } else {
            left - elapsed + self.increment_for(color)
        };
        match color {
            Color::White => self.wtime = updated,
            Color::Black => self.btime = updated,
        }
        !flag_fell
    }
}

/// Engine-style limit handed over on the first move of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchLimit {
    pub time: Option<Duration>,
    pub depth: Option<u8>,
    pub nodes: Option<u64>,
}

/// What a strategy is told about its remaining time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeLeft {
    /// Concrete remaining time on the mover's clock.
    Clock(Duration),
    /// First-move sentinel carrying a search limit instead of a clock.
    Limit(SearchLimit),
}

impl Default for TimeLeft {
    fn default() -> Self {
        TimeLeft::Limit(SearchLimit::default())
    }
}

/// Time to spend on each of `candidates` moves so that a full scan stays
/// within `1 / turn_fraction` of the remaining clock.
///
/// With a concrete clock `T` and `N` candidates the budget shrinks to
/// `(T / turn_fraction) / N` whenever `N * base` would exceed
/// `T / turn_fraction`; otherwise it is `base`. A `Limit` always gets `base`.
pub fn per_candidate_budget(
    time_left: &TimeLeft,
    candidates: usize,
    base: Duration,
    turn_fraction: u32,
) -> Duration {
    let remaining = match time_left {
        TimeLeft::Clock(remaining) => *remaining,
        TimeLeft::Limit(_) => return base,
    };
    if candidates == 0 {
        return base;
    }

    let n = u32::try_from(candidates).unwrap_or(u32::MAX);
    let turn_share = remaining / turn_fraction.max(1);
    if base.saturating_mul(n) > turn_share {
        turn_share / n
    } else {
        base
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use shakmaty::Color;

    use super::{
        per_candidate_budget, Clock, SearchLimit, TimeLeft, DEFAULT_BASE_SEARCH_TIME,
        DEFAULT_TURN_FRACTION,
    };

    fn budget(remaining_ms: u64, candidates: usize) -> Duration {
        per_candidate_budget(
            &TimeLeft::Clock(Duration::from_millis(remaining_ms)),
            candidates,
            DEFAULT_BASE_SEARCH_TIME,
            DEFAULT_TURN_FRACTION,
        )
    }

    #[test]
    fn plenty_of_time_keeps_base_budget() {
        assert_eq!(budget(60_000, 20), Duration::from_millis(100));
    }

    #[test]
    fn short_clock_shrinks_to_tenth_split_evenly() {
        // 20 * 100ms = 2s > 10s / 10
        assert_eq!(budget(10_000, 20), Duration::from_millis(50));
        assert_eq!(budget(3_000, 30), Duration::from_millis(10));
    }

    #[test]
    fn exact_threshold_does_not_shrink() {
        // 20 * 100ms == 20s / 10
        assert_eq!(budget(20_000, 20), Duration::from_millis(100));
        assert_eq!(budget(19_990, 20), Duration::from_micros(99_950));
    }

    #[test]
    fn first_move_limit_is_never_divided() {
        let limit = TimeLeft::Limit(SearchLimit {
            time: Some(Duration::from_millis(5)),
            ..SearchLimit::default()
        });
        assert_eq!(
            per_candidate_budget(&limit, 40, DEFAULT_BASE_SEARCH_TIME, DEFAULT_TURN_FRACTION),
            DEFAULT_BASE_SEARCH_TIME
        );
    }

    #[test]
    fn clock_selects_side_and_charges_increment() {
        let mut clock = Clock {
            wtime: Duration::from_secs(60),
            btime: Duration::from_secs(30),
            winc: Duration::from_secs(2),
            binc: Duration::from_secs(1),
        };
        assert_eq!(clock.remaining_for(Color::White), Duration::from_secs(60));
        assert_eq!(clock.remaining_for(Color::Black), Duration::from_secs(30));

        assert!(clock.charge(Color::White, Duration::from_secs(5)));
        assert_eq!(clock.wtime, Duration::from_secs(57));

        assert!(!clock.charge(Color::Black, Duration::from_secs(31)));
        assert_eq!(clock.btime, Duration::ZERO);
    }
}
