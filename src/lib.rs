//! Crate root module declarations for the homemade strategy bots.
//!
//! Exposes the board adapter, the strategy contract and its example
//! implementations, the evaluation-oracle client, the UCI front-end and the
//! local match harness so binaries, benches and tests share stable paths.

pub mod errors;

pub mod game_state {
    pub mod board;
}

pub mod evaluation {
    pub mod evaluator;
    pub mod score;
    pub mod uci_evaluator;
}

pub mod tables {
    pub mod opening_book;
}

pub mod engines {
    pub mod engine_alphabetical;
    pub mod engine_anarchy;
    pub mod engine_first_move;
    pub mod engine_random;
    pub mod engine_trait;
    pub mod filler_engine;
    pub mod strategy_factory;
    pub mod time_management;
}

pub mod uci {
    pub mod uci_top;
}

pub mod utils {
    pub mod engine_match_harness;
}
