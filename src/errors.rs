//! Errors used throughout the strategy crate.
//!
//! `StrategyErrors` is the single error type returned by the board adapter,
//! the evaluation oracle client, the strategies and the drivers built on top
//! of them. Variants carry the offending FEN or token where that helps a
//! driver report a precise diagnostic.
//!
//! Usage guidelines:
//! - Strategy code returns `Result<..., StrategyErrors>` and propagates with
//!   `?`; no layer in this crate retries a failed evaluation.
//! - Evaluator variants are fatal for the current turn. Drivers should report
//!   them and either resign or fall back to a null move.

use std::io;

use thiserror::Error;

/// Unified error type for strategies and their collaborators.
#[derive(Error, Debug)]
pub enum StrategyErrors {
    /// `search` was called on a position with no legal moves.
    ///
    /// Payload: FEN of the position.
    #[error("no legal moves are available in position {0}")]
    NoLegalMoves(String),

    /// Every candidate was filtered out before scoring, so there is nothing
    /// to return (for example the only legal move is a banned rook move).
    ///
    /// Payload: FEN of the position.
    #[error("no eligible candidate move survived filtering in position {0}")]
    NoEligibleMove(String),

    /// A FEN string could not be parsed or does not describe a legal setup.
    #[error("invalid FEN '{fen}': {reason}")]
    InvalidFen { fen: String, reason: String },

    /// A coordinate move string was malformed or illegal in the position.
    #[error("invalid move '{0}'")]
    InvalidMove(String),

    /// `pop` was called with no pushed move outstanding.
    #[error("cannot pop from an empty move stack")]
    EmptyMoveStack,

    /// The evaluation oracle binary could not be started.
    #[error("failed to start evaluator '{path}': {source}")]
    EvaluatorSpawn {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Reading from or writing to the evaluator process or the driver's
    /// output stream failed.
    #[error("i/o failure: {0}")]
    Io(#[from] io::Error),

    /// The evaluator closed its output before answering.
    #[error("evaluator closed its output stream")]
    EvaluatorClosed,

    /// The evaluator finished a search without reporting any score.
    ///
    /// Payload: FEN of the evaluated position.
    #[error("evaluator reported no score for position {0}")]
    MissingScore(String),

    /// The strategy's evaluator has already been released by `quit`.
    #[error("evaluator has already been shut down")]
    EvaluatorShutDown,

    /// A strategy name did not match any known strategy.
    #[error("unknown strategy '{0}'")]
    UnknownStrategy(String),

    /// A configuration option received a value it cannot use.
    #[error("invalid value '{value}' for option '{name}'")]
    InvalidOption { name: String, value: String },

    /// A strategy returned a move outside the legal-move set.
    ///
    /// Payload: the offending move in coordinate notation.
    #[error("strategy returned illegal move {0}")]
    IllegalMoveReturned(String),

    /// An opening-book table could not be parsed.
    #[error("invalid opening book: {0}")]
    InvalidOpeningBook(String),
}
