//! Stand-in for a real engine process.
//!
//! Drivers written against an engine interface can hold a `FillerEngine`
//! for strategies that have no engine behind them. Every method reports the
//! corresponding `EngineEvent` to the owning strategy and does nothing else.

use shakmaty::Move;

use crate::engines::engine_trait::{EngineEvent, Strategy};

pub struct FillerEngine<'a> {
    owner: &'a mut dyn Strategy,
    name: String,
}

impl<'a> FillerEngine<'a> {
    pub fn new(owner: &'a mut dyn Strategy) -> Self {
        let name = owner.name().to_owned();
        Self { owner, name }
    }

    /// Engine id reported to the driver.
    pub fn id(&self) -> &str {
        &self.name
    }

    fn forward(&mut self, event: EngineEvent<'_>) {
        self.owner.notify(&event);
    }

    pub fn new_game(&mut self) {
        self.forward(EngineEvent::NewGame);
    }

    pub fn configure(&mut self, name: &str, value: &str) {
        self.forward(EngineEvent::Configure { name, value });
    }

    pub fn ping(&mut self) {
        self.forward(EngineEvent::Ping);
    }

    pub fn opponent_move(&mut self, mv: &Move) {
        self.forward(EngineEvent::OpponentMove(mv));
    }

    pub fn info(&mut self, line: &str) {
        self.forward(EngineEvent::Info(line));
    }

    pub fn game_over(&mut self, result: &str) {
        self.forward(EngineEvent::GameOver(result));
    }

    pub fn quit(&mut self) {
        self.forward(EngineEvent::Quit);
    }
}
