//! Placement-keyed table of hard-coded replies.
//!
//! Lookups compare the board placement string exactly: side to move, castling
//! rights and move counters are ignored, and transpositions that reach the
//! same placement match while any other difference does not.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::errors::StrategyErrors;
use crate::game_state::board::Board;

const ANARCHY_REPLIES: [(&str, &str); 3] = [
    ("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR", "e2e4"),
    ("rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR", "g1f3"),
    ("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R", "f1b5"),
];

#[derive(Debug, Clone, Default)]
pub struct OpeningBook {
    by_placement: HashMap<String, String>,
}

impl OpeningBook {
    /// 1.e4, then the Ruy Lopez after 1.e4 e5 and 2.Nf3 Nc6.
    pub fn anarchy() -> Self {
        let by_placement = ANARCHY_REPLIES
            .iter()
            .map(|(placement, reply)| ((*placement).to_owned(), (*reply).to_owned()))
            .collect();
        Self { by_placement }
    }

    pub fn from_tsv_path(path: impl AsRef<Path>) -> Result<Self, StrategyErrors> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|e| {
            StrategyErrors::InvalidOpeningBook(format!("failed reading {}: {e}", path.display()))
        })?;
        Self::from_tsv_str(&data)
    }

    /// Parse a tab-separated table with `placement` and `uci` header columns.
    pub fn from_tsv_str(tsv: &str) -> Result<Self, StrategyErrors> {
        let mut lines = tsv.lines().filter(|line| !line.trim().is_empty());
        let header = lines
            .next()
            .ok_or_else(|| StrategyErrors::InvalidOpeningBook("opening TSV is empty".to_owned()))?;

        let mut placement_idx = None;
        let mut uci_idx = None;
        for (i, name) in header.split('\t').enumerate() {
            match name.trim().to_ascii_lowercase().as_str() {
                "placement" | "board_fen" => placement_idx = Some(i),
                "uci" | "reply" => uci_idx = Some(i),
                _ => {}
            }
        }
        let (placement_idx, uci_idx) = placement_idx.zip(uci_idx).ok_or_else(|| {
            StrategyErrors::InvalidOpeningBook(
                "opening TSV must contain 'placement' and 'uci' columns".to_owned(),
            )
        })?;

        let mut by_placement = HashMap::new();
        for line in lines {
            let fields: Vec<&str> = line.split('\t').collect();
            let field = |idx: usize| {
                fields
                    .get(idx)
                    .map(|s| s.trim())
                    .filter(|s| !s.is_empty())
                    .ok_or_else(|| {
                        StrategyErrors::InvalidOpeningBook(format!("incomplete row '{line}'"))
                    })
            };
            let placement = field(placement_idx)?;
            let reply = field(uci_idx)?;
            by_placement.insert(placement.to_owned(), reply.to_owned());
        }

        Ok(Self { by_placement })
    }

    /// Merge `other` into this book; its entries win on conflicts.
    pub fn extend(&mut self, other: OpeningBook) {
        self.by_placement.extend(other.by_placement);
    }

    pub fn len(&self) -> usize {
        self.by_placement.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_placement.is_empty()
    }

    pub fn reply_for(&self, board: &Board) -> Option<&str> {
        self.by_placement
            .get(&board.board_fen())
            .map(|reply| reply.as_str())
    }
}
