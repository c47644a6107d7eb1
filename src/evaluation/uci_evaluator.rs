//! UCI engine process used as an evaluation oracle.
//!
//! Speaks the smallest useful subset of UCI: handshake, `position fen`,
//! `go movetime`, and `quit`. The last `score` reported before `bestmove`
//! is the evaluation.

use std::ffi::OsStr;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::Duration;

use log::{debug, warn};

use crate::errors::StrategyErrors;
use crate::evaluation::evaluator::{parse_info_score, Evaluator};
use crate::evaluation::score::Score;
use crate::game_state::board::Board;

pub struct UciEvaluator {
    child: Child,
    stdin: ChildStdin,
    reader: BufReader<ChildStdout>,
    closed: bool,
}

impl UciEvaluator {
    /// Start the engine binary at `path` and complete the UCI handshake.
    pub fn spawn(path: impl AsRef<OsStr>) -> Result<Self, StrategyErrors> {
        let path = path.as_ref();
        let mut child = Command::new(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| StrategyErrors::EvaluatorSpawn {
                path: path.to_string_lossy().into_owned(),
                source,
            })?;

        let (stdin, stdout) = match (child.stdin.take(), child.stdout.take()) {
            (Some(stdin), Some(stdout)) => (stdin, stdout),
            _ => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(StrategyErrors::EvaluatorClosed);
            }
        };

        let mut evaluator = Self {
            child,
            stdin,
            reader: BufReader::new(stdout),
            closed: false,
        };
        evaluator.send("uci")?;
        evaluator.wait_for("uciok")?;
        evaluator.send("isready")?;
        evaluator.wait_for("readyok")?;
        debug!("evaluator {} ready", path.to_string_lossy());
        Ok(evaluator)
    }

    fn send(&mut self, command: &str) -> Result<(), StrategyErrors> {
        writeln!(self.stdin, "{command}")?;
        self.stdin.flush()?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<String, StrategyErrors> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(StrategyErrors::EvaluatorClosed);
        }
        Ok(line.trim_end().to_owned())
    }

    fn wait_for(&mut self, token: &str) -> Result<(), StrategyErrors> {
        loop {
            if self.read_line()? == token {
                return Ok(());
            }
        }
    }
}

impl Evaluator for UciEvaluator {
    fn evaluate(&mut self, board: &Board, time_limit: Duration) -> Result<Score, StrategyErrors> {
        if self.closed {
            return Err(StrategyErrors::EvaluatorShutDown);
        }

        let fen = board.fen();
        let movetime_ms = time_limit.as_millis().max(1);
        self.send(&format!("position fen {fen}"))?;
        self.send(&format!("go movetime {movetime_ms}"))?;

        let mut score = None;
        loop {
            let line = self.read_line()?;
            if line.starts_with("bestmove") {
                break;
            }
            if let Some(reported) = parse_info_score(&line) {
                score = Some(reported);
            }
        }

        score.ok_or(StrategyErrors::MissingScore(fen))
    }

    fn close(&mut self) -> Result<(), StrategyErrors> {
        if self.closed {
            return Ok(());
        }
        // Reap the child even if it already exited and `quit` cannot be sent.
        let sent = self.send("quit");
        let waited = self.child.wait();
        self.closed = true;
        sent?;
        waited?;
        Ok(())
    }
}

impl Drop for UciEvaluator {
    fn drop(&mut self) {
        if !self.closed {
            warn!("evaluator dropped without quit; killing process");
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}
