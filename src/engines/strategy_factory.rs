//! Name-based construction of the example strategies.

use std::fmt;
use std::str::FromStr;

use crate::engines::engine_alphabetical::Alphabetical;
use crate::engines::engine_anarchy::{Anarchy, AnarchyConfig};
use crate::engines::engine_first_move::FirstMove;
use crate::engines::engine_random::RandomMove;
use crate::engines::engine_trait::Strategy;
use crate::errors::StrategyErrors;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    RandomMove,
    Alphabetical,
    FirstMove,
    Anarchy,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 4] = [
        StrategyKind::RandomMove,
        StrategyKind::Alphabetical,
        StrategyKind::FirstMove,
        StrategyKind::Anarchy,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::RandomMove => "RandomMove",
            StrategyKind::Alphabetical => "Alphabetical",
            StrategyKind::FirstMove => "FirstMove",
            StrategyKind::Anarchy => "Anarchy",
        }
    }

    /// Whether building this strategy starts an evaluator process.
    pub fn needs_evaluator(self) -> bool {
        matches!(self, StrategyKind::Anarchy)
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrategyKind {
    type Err = StrategyErrors;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        StrategyKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(wanted))
            .or_else(|| match wanted.to_ascii_lowercase().as_str() {
                "random" => Some(StrategyKind::RandomMove),
                "first" | "lexicographic" => Some(StrategyKind::FirstMove),
                _ => None,
            })
            .ok_or_else(|| StrategyErrors::UnknownStrategy(wanted.to_owned()))
    }
}

pub fn build_strategy(
    kind: StrategyKind,
    config: &AnarchyConfig,
) -> Result<Box<dyn Strategy>, StrategyErrors> {
    Ok(match kind {
        StrategyKind::RandomMove => Box::new(RandomMove::new()),
        StrategyKind::Alphabetical => Box::new(Alphabetical::new()),
        StrategyKind::FirstMove => Box::new(FirstMove::new()),
        StrategyKind::Anarchy => Box::new(Anarchy::spawn(config.clone())?),
    })
}
