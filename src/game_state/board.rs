//! Board adapter over the `shakmaty` rules engine.
//!
//! Strategies need a mutable position with a strict push/pop stack, SAN and
//! coordinate rendering, and a placement string for exact opening lookups.
//! `Board` keeps one snapshot per pushed move so `pop` restores the previous
//! state exactly, including move counters.

use shakmaty::fen::Fen;
use shakmaty::san::SanPlus;
use shakmaty::uci::Uci;
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, Move, Position};

use crate::errors::StrategyErrors;

pub const STARTPOS_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Debug, Clone, Default)]
pub struct Board {
    position: Chess,
    move_stack: Vec<Move>,
    undo_stack: Vec<Chess>,
}

impl Board {
    pub fn new_game() -> Self {
        Self::default()
    }

    pub fn from_fen(fen: &str) -> Result<Self, StrategyErrors> {
        let parsed: Fen = fen.parse().map_err(|e| StrategyErrors::InvalidFen {
            fen: fen.to_owned(),
            reason: format!("{e}"),
        })?;
        let position: Chess =
            parsed
                .into_position(CastlingMode::Standard)
                .map_err(|e| StrategyErrors::InvalidFen {
                    fen: fen.to_owned(),
                    reason: format!("{e}"),
                })?;
        Ok(Self::from_position(position))
    }

    pub fn from_position(position: Chess) -> Self {
        Self {
            position,
            move_stack: Vec::new(),
            undo_stack: Vec::new(),
        }
    }

    pub fn turn(&self) -> Color {
        self.position.turn()
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        self.position.legal_moves().into_iter().collect()
    }

    pub fn is_legal(&self, mv: &Move) -> bool {
        self.position.is_legal(mv)
    }

    /// Apply `mv`, which must be legal in the current position.
    pub fn push(&mut self, mv: &Move) {
        self.undo_stack.push(self.position.clone());
        self.position.play_unchecked(mv);
        self.move_stack.push(mv.clone());
    }

    /// Parse a coordinate move, check it is legal, and apply it.
    pub fn push_uci(&mut self, uci: &str) -> Result<Move, StrategyErrors> {
        let mv = self.parse_uci(uci)?;
        self.push(&mv);
        Ok(mv)
    }

    /// Undo the most recent `push`.
    pub fn pop(&mut self) -> Result<Move, StrategyErrors> {
        let previous = self.undo_stack.pop().ok_or(StrategyErrors::EmptyMoveStack)?;
        let mv = self.move_stack.pop().ok_or(StrategyErrors::EmptyMoveStack)?;
        self.position = previous;
        Ok(mv)
    }

    pub fn peek(&self) -> Option<&Move> {
        self.move_stack.last()
    }

    pub fn move_stack(&self) -> &[Move] {
        &self.move_stack
    }

    /// Piece placement only: the first FEN field.
    pub fn board_fen(&self) -> String {
        self.position.board().to_string()
    }

    pub fn fen(&self) -> String {
        Fen::from_position(self.position.clone(), EnPassantMode::Legal).to_string()
    }

    /// FEN without the halfmove and fullmove counters, used as the
    /// repetition key.
    pub fn repetition_key(&self) -> String {
        repetition_key_of(&self.position)
    }

    /// How often the current position has occurred since the board was
    /// created, counting the current occurrence.
    pub fn repetition_count(&self) -> usize {
        let key = self.repetition_key();
        1 + self
            .undo_stack
            .iter()
            .filter(|earlier| repetition_key_of(earlier) == key)
            .count()
    }

    /// Standard algebraic notation including the `+`/`#` suffix.
    pub fn san(&self, mv: &Move) -> String {
        SanPlus::from_move(self.position.clone(), mv).to_string()
    }

    /// Coordinate notation; castling is rendered as the king's two-square move.
    pub fn uci(&self, mv: &Move) -> String {
        mv.to_uci(CastlingMode::Standard).to_string()
    }

    pub fn parse_uci(&self, uci: &str) -> Result<Move, StrategyErrors> {
        let parsed: Uci = uci
            .parse()
            .map_err(|_| StrategyErrors::InvalidMove(uci.to_owned()))?;
        parsed
            .to_move(&self.position)
            .map_err(|_| StrategyErrors::InvalidMove(uci.to_owned()))
    }

    pub fn is_en_passant(&self, mv: &Move) -> bool {
        mv.is_en_passant()
    }

    pub fn is_checkmate(&self) -> bool {
        self.position.is_checkmate()
    }

    pub fn is_stalemate(&self) -> bool {
        self.position.is_stalemate()
    }

    pub fn is_insufficient_material(&self) -> bool {
        self.position.is_insufficient_material()
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.position.halfmoves()
    }
}

fn repetition_key_of(position: &Chess) -> String {
    let fen = Fen::from_position(position.clone(), EnPassantMode::Legal).to_string();
    fen.split_whitespace().take(4).collect::<Vec<_>>().join(" ")
}
