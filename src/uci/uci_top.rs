//! UCI protocol front-end and command loop.
//!
//! Lets any example strategy play as a UCI engine: parses commands, keeps the
//! current position, reports driver events through a `FillerEngine`, and
//! routes `go` to `search_with_ponder` (clock given) or `search` (limit only).

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use log::{info, warn};

use crate::engines::engine_anarchy::AnarchyConfig;
use crate::engines::engine_random::RandomMove;
use crate::engines::engine_trait::Strategy;
use crate::engines::filler_engine::FillerEngine;
use crate::engines::strategy_factory::{build_strategy, StrategyKind};
use crate::engines::time_management::{SearchLimit, TimeLeft};
use crate::errors::StrategyErrors;
use crate::game_state::board::Board;
use crate::tables::opening_book::OpeningBook;

const UCI_ENGINE_NAME: &str = "Homemade Strategies";
const UCI_ENGINE_AUTHOR: &str = "homemade_strategies contributors";

pub fn run_stdio_loop() -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut uci = UciState::new();

    for line in stdin.lock().lines() {
        let line = line?;
        let should_quit = uci.handle_command(&line, &mut stdout)?;
        stdout.flush()?;
        if should_quit {
            return Ok(());
        }
    }

    // Input closed without `quit`.
    uci.shutdown();
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct GoParams {
    depth: Option<u8>,
    nodes: Option<u64>,
    movetime_ms: Option<u64>,
    wtime_ms: Option<u64>,
    btime_ms: Option<u64>,
    winc_ms: Option<u64>,
    binc_ms: Option<u64>,
    ponder: bool,
}

struct UciState {
    board: Board,
    strategy: Box<dyn Strategy>,
    strategy_kind: StrategyKind,
    anarchy_config: AnarchyConfig,
    ponder: bool,
    debug_mode: bool,
}

impl UciState {
    fn new() -> Self {
        let strategy_kind = StrategyKind::RandomMove;
        let anarchy_config = AnarchyConfig::from_env();
        Self {
            board: Board::new_game(),
            strategy: Box::new(RandomMove::new()),
            strategy_kind,
            anarchy_config,
            ponder: false,
            debug_mode: false,
        }
    }

    fn filler(&mut self) -> FillerEngine<'_> {
        FillerEngine::new(self.strategy.as_mut())
    }

    fn shutdown(&mut self) {
        self.filler().quit();
        if let Err(err) = self.strategy.quit() {
            warn!("strategy quit failed: {err}");
        }
    }

    fn handle_command(&mut self, line: &str, out: &mut impl Write) -> io::Result<bool> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(false);
        }

        let mut parts = trimmed.split_whitespace();
        let cmd = parts.next().unwrap_or_default();

        match cmd {
            "uci" => {
                let strategy_id = self.filler().id().to_owned();
                writeln!(out, "id name {} ({})", UCI_ENGINE_NAME, strategy_id)?;
                writeln!(out, "id author {}", UCI_ENGINE_AUTHOR)?;
                let vars = StrategyKind::ALL
                    .iter()
                    .map(|kind| format!("var {}", kind.name()))
                    .collect::<Vec<_>>()
                    .join(" ");
                writeln!(
                    out,
                    "option name Strategy type combo default {} {}",
                    self.strategy_kind, vars
                )?;
                writeln!(
                    out,
                    "option name EvaluatorPath type string default {}",
                    self.anarchy_config.evaluator_path.display()
                )?;
                writeln!(
                    out,
                    "option name BaseSearchTime type spin default {} min 1 max 10000",
                    self.anarchy_config.base_search_time.as_millis()
                )?;
                writeln!(out, "option name OpeningBook type string default <empty>")?;
                writeln!(out, "option name Ponder type check default false")?;
                writeln!(out, "uciok")?;
            }
            "isready" => {
                self.filler().ping();
                writeln!(out, "readyok")?;
            }
            "setoption" => {
                if let Err(err) = self.handle_setoption(trimmed) {
                    writeln!(out, "info string setoption error: {}", err)?;
                }
            }
            "ucinewgame" => {
                self.board = Board::new_game();
                self.filler().new_game();
            }
            "position" => {
                if let Err(err) = self.handle_position(trimmed) {
                    writeln!(out, "info string position error: {}", err)?;
                }
            }
            "go" => {
                if let Err(err) = self.handle_go(trimmed, out) {
                    writeln!(out, "info string go error: {}", err)?;
                    writeln!(out, "bestmove 0000")?;
                }
            }
            "stop" | "ponderhit" => {
                // Search is synchronous; nothing is running in the background.
            }
            "debug" => {
                let mode = parts.next().unwrap_or_default();
                self.debug_mode = mode.eq_ignore_ascii_case("on");
            }
            "quit" => {
                self.shutdown();
                return Ok(true);
            }
            _ => {
                // Unknown commands are ignored for UCI compatibility.
            }
        }

        Ok(false)
    }

    fn handle_setoption(&mut self, line: &str) -> Result<(), StrategyErrors> {
        let mut tokens = line.split_whitespace();
        let _ = tokens.next(); // setoption

        let mut name_tokens = Vec::<&str>::new();
        let mut value_tokens = Vec::<&str>::new();
        let mut mode = "";

        for tok in tokens {
            match tok {
                "name" => mode = "name",
                "value" => mode = "value",
                _ if mode == "name" => name_tokens.push(tok),
                _ if mode == "value" => value_tokens.push(tok),
                _ => {}
            }
        }

        let name = name_tokens.join(" ");
        let value = value_tokens.join(" ");
        let invalid = || StrategyErrors::InvalidOption {
            name: name.clone(),
            value: value.clone(),
        };

        if name.eq_ignore_ascii_case("Strategy") {
            let kind = value.parse::<StrategyKind>()?;
            self.switch_strategy(kind)?;
        } else if name.eq_ignore_ascii_case("EvaluatorPath") {
            if value.is_empty() {
                return Err(invalid());
            }
            self.anarchy_config.evaluator_path = PathBuf::from(&value);
            self.reload_configured_strategy()?;
        } else if name.eq_ignore_ascii_case("OpeningBook") {
            if value.is_empty() || value == "<empty>" {
                return Ok(());
            }
            let extra = OpeningBook::from_tsv_path(&value)?;
            info!("loaded {} opening replies from {value}", extra.len());
            self.anarchy_config.opening_book.extend(extra);
            self.reload_configured_strategy()?;
        } else if name.eq_ignore_ascii_case("BaseSearchTime") {
            let ms = value
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .ok_or_else(invalid)?;
            self.anarchy_config.base_search_time = Duration::from_millis(ms);
            self.reload_configured_strategy()?;
        } else if name.eq_ignore_ascii_case("Ponder") {
            let lower = value.to_ascii_lowercase();
            self.ponder = matches!(lower.as_str(), "true" | "1" | "yes" | "on");
        } else {
            self.filler().configure(&name, &value);
        }

        Ok(())
    }

    fn switch_strategy(&mut self, kind: StrategyKind) -> Result<(), StrategyErrors> {
        let replacement = build_strategy(kind, &self.anarchy_config)?;
        if let Err(err) = self.strategy.quit() {
            warn!("previous strategy quit failed: {err}");
        }
        self.strategy = replacement;
        self.strategy_kind = kind;
        info!("strategy switched to {kind}");
        Ok(())
    }

    /// Rebuild the current strategy when it was built from `anarchy_config`.
    fn reload_configured_strategy(&mut self) -> Result<(), StrategyErrors> {
        if self.strategy_kind.needs_evaluator() {
            self.switch_strategy(self.strategy_kind)?;
        }
        Ok(())
    }

    fn handle_position(&mut self, line: &str) -> Result<(), StrategyErrors> {
        let mut tokens = line.split_whitespace().peekable();
        let _ = tokens.next(); // "position"

        let mut board = match tokens.next() {
            Some("startpos") => Board::new_game(),
            Some("fen") => {
                let mut fen_parts = Vec::<&str>::new();
                while let Some(next) = tokens.peek() {
                    if *next == "moves" {
                        break;
                    }
                    fen_parts.extend(tokens.next());
                }
                if fen_parts.is_empty() {
                    return Err(StrategyErrors::InvalidFen {
                        fen: String::new(),
                        reason: "missing FEN after 'position fen'".to_owned(),
                    });
                }
                Board::from_fen(&fen_parts.join(" "))?
            }
            other => {
                return Err(StrategyErrors::InvalidFen {
                    fen: other.unwrap_or_default().to_owned(),
                    reason: "expected 'startpos' or 'fen'".to_owned(),
                })
            }
        };

        if tokens.peek().copied() == Some("moves") {
            let _ = tokens.next();
            for uci in tokens {
                board.push_uci(uci)?;
            }
        }

        self.board = board;
        if let Some(last) = self.board.peek().cloned() {
            self.filler().opponent_move(&last);
        }
        Ok(())
    }

    fn handle_go(&mut self, line: &str, out: &mut impl Write) -> Result<(), StrategyErrors> {
        let params = parse_go_params(line);
        let ponder = params.ponder || self.ponder;

        let best_move = match (params.wtime_ms, params.btime_ms) {
            (Some(wtime), Some(btime)) => self.strategy.search_with_ponder(
                &mut self.board,
                Duration::from_millis(wtime),
                Duration::from_millis(btime),
                Duration::from_millis(params.winc_ms.unwrap_or(0)),
                Duration::from_millis(params.binc_ms.unwrap_or(0)),
                ponder,
            )?,
            _ => {
                let limit = SearchLimit {
                    time: params.movetime_ms.map(Duration::from_millis),
                    depth: params.depth,
                    nodes: params.nodes,
                };
                self.strategy
                    .search(&mut self.board, &TimeLeft::Limit(limit), ponder)?
            }
        };

        if !self.board.is_legal(&best_move) {
            return Err(StrategyErrors::IllegalMoveReturned(
                self.board.uci(&best_move),
            ));
        }

        if self.debug_mode {
            writeln!(
                out,
                "info string {} chose {}",
                self.strategy.name(),
                self.board.san(&best_move)
            )?;
        }
        writeln!(out, "bestmove {}", self.board.uci(&best_move))?;
        Ok(())
    }
}

fn parse_go_params(line: &str) -> GoParams {
    let mut params = GoParams::default();
    let tokens = line.split_whitespace().collect::<Vec<_>>();
    let mut i = 0usize;
    while i < tokens.len() {
        match tokens[i] {
            "depth" => {
                i += 1;
                params.depth = tokens.get(i).and_then(|x| x.parse::<u8>().ok());
            }
            "nodes" => {
                i += 1;
                params.nodes = tokens.get(i).and_then(|x| x.parse::<u64>().ok());
            }
            "movetime" => {
                i += 1;
                params.movetime_ms = tokens.get(i).and_then(|x| x.parse::<u64>().ok());
            }
            "ponder" => {
                params.ponder = true;
            }
            "wtime" => {
                i += 1;
                params.wtime_ms = tokens.get(i).and_then(|x| x.parse::<u64>().ok());
            }
            "btime" => {
                i += 1;
                params.btime_ms = tokens.get(i).and_then(|x| x.parse::<u64>().ok());
            }
            "winc" => {
                i += 1;
                params.winc_ms = tokens.get(i).and_then(|x| x.parse::<u64>().ok());
            }
            "binc" => {
                i += 1;
                params.binc_ms = tokens.get(i).and_then(|x| x.parse::<u64>().ok());
            }
            _ => {}
        }
        i += 1;
    }
    params
}

#[cfg(test)]
mod tests {
    use super::{parse_go_params, UciState};
    use crate::engines::strategy_factory::StrategyKind;

    fn run(state: &mut UciState, line: &str) -> String {
        let mut out = Vec::<u8>::new();
        state
            .handle_command(line, &mut out)
            .expect("writing to a Vec should not fail");
        String::from_utf8(out).expect("output should be utf-8")
    }

    #[test]
    fn uci_lists_strategies_and_ends_with_uciok() {
        let mut state = UciState::new();
        let out = run(&mut state, "uci");
        assert!(out.starts_with("id name Homemade Strategies (RandomMove)"));
        assert!(out.contains("option name OpeningBook"));
        assert!(out.contains("var Anarchy"));
        assert!(out.contains("var Alphabetical"));
        assert!(out.trim_end().ends_with("uciok"));
    }

    #[test]
    fn position_startpos_with_moves_updates_state() {
        let mut state = UciState::new();
        state
            .handle_position("position startpos moves e2e4 e7e5 g1f3")
            .expect("position command should parse");
        assert_eq!(state.board.turn(), shakmaty::Color::Black);
        assert_eq!(state.board.move_stack().len(), 3);
    }

    #[test]
    fn position_fen_without_moves_updates_state() {
        let mut state = UciState::new();
        state
            .handle_position("position fen 4k3/8/8/8/8/8/4P3/4K3 w - - 0 1")
            .expect("position fen should parse");
        assert_eq!(state.board.fen(), "4k3/8/8/8/8/8/4P3/4K3 w - - 0 1");
    }

    #[test]
    fn position_with_illegal_move_is_rejected_and_keeps_board() {
        let mut state = UciState::new();
        assert!(state
            .handle_position("position startpos moves e2e5")
            .is_err());
        assert_eq!(state.board.move_stack().len(), 0);
    }

    #[test]
    fn setoption_strategy_switches_engine() {
        let mut state = UciState::new();
        assert_eq!(state.strategy_kind, StrategyKind::RandomMove);

        state
            .handle_setoption("setoption name Strategy value Alphabetical")
            .expect("setoption should parse");
        assert_eq!(state.strategy_kind, StrategyKind::Alphabetical);
        assert_eq!(state.strategy.name(), "Alphabetical");

        assert!(state
            .handle_setoption("setoption name Strategy value Minimax")
            .is_err());
        assert_eq!(state.strategy_kind, StrategyKind::Alphabetical);
    }

    #[test]
    fn anarchy_with_missing_evaluator_keeps_previous_strategy() {
        let mut state = UciState::new();
        state
            .handle_setoption("setoption name EvaluatorPath value /nonexistent/stockfish")
            .expect("path should be accepted");
        assert!(state
            .handle_setoption("setoption name Strategy value Anarchy")
            .is_err());
        assert_eq!(state.strategy_kind, StrategyKind::RandomMove);
    }

    #[test]
    fn setoption_opening_book_extends_anarchy_book() {
        let path = std::env::temp_dir().join(format!(
            "homemade_uci_book_{}.tsv",
            std::process::id()
        ));
        std::fs::write(
            &path,
            "placement\tuci\nrnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR\tc7c5\n",
        )
        .expect("temp book should be writable");

        let mut state = UciState::new();
        let before = state.anarchy_config.opening_book.len();
        state
            .handle_setoption(&format!("setoption name OpeningBook value {}", path.display()))
            .expect("book file should load");
        std::fs::remove_file(&path).expect("temp book should be removable");
        assert_eq!(state.anarchy_config.opening_book.len(), before + 1);
        assert_eq!(state.strategy_kind, StrategyKind::RandomMove);

        assert!(state
            .handle_setoption("setoption name OpeningBook value /nonexistent/book.tsv")
            .is_err());
        assert_eq!(state.anarchy_config.opening_book.len(), before + 1);
    }

    #[test]
    fn setoption_base_search_time_validates() {
        let mut state = UciState::new();
        state
            .handle_setoption("setoption name BaseSearchTime value 250")
            .expect("spin value should parse");
        assert_eq!(
            state.anarchy_config.base_search_time,
            std::time::Duration::from_millis(250)
        );
        assert!(state
            .handle_setoption("setoption name BaseSearchTime value 0")
            .is_err());
        state
            .handle_setoption("setoption name Hash value 64")
            .expect("unknown options are forwarded, not rejected");
    }

    #[test]
    fn go_with_clock_returns_bestmove() {
        let mut state = UciState::new();
        run(&mut state, "setoption name Strategy value FirstMove");
        run(&mut state, "position startpos moves e2e4");
        let out = run(&mut state, "go wtime 60000 btime 60000 winc 0 binc 0");
        assert_eq!(out.trim_end(), "bestmove a7a5");
    }

    #[test]
    fn go_without_clock_uses_limit() {
        let mut state = UciState::new();
        run(&mut state, "setoption name Strategy value Alphabetical");
        let out = run(&mut state, "go movetime 500");
        assert_eq!(out.trim_end(), "bestmove b1a3");
    }

    #[test]
    fn go_on_finished_game_reports_null_move() {
        let mut state = UciState::new();
        run(
            &mut state,
            "position fen rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3",
        );
        let out = run(&mut state, "go movetime 100");
        assert!(out.contains("info string go error"));
        assert!(out.trim_end().ends_with("bestmove 0000"));
    }

    #[test]
    fn quit_returns_true() {
        let mut state = UciState::new();
        let mut out = Vec::<u8>::new();
        assert!(state
            .handle_command("quit", &mut out)
            .expect("quit should not fail"));
    }

    #[test]
    fn parse_go_params_keeps_clock_fields() {
        let params = parse_go_params("go wtime 120000 btime 60000 winc 1000 binc 1000");
        assert_eq!(params.movetime_ms, None);
        assert_eq!(params.wtime_ms, Some(120_000));
        assert_eq!(params.btime_ms, Some(60_000));
        assert_eq!(params.winc_ms, Some(1_000));
        assert_eq!(params.binc_ms, Some(1_000));
    }

    #[test]
    fn parse_go_params_parses_limits_and_ponder() {
        let params = parse_go_params("go ponder depth 6 nodes 50000 movetime 300");
        assert!(params.ponder);
        assert_eq!(params.depth, Some(6));
        assert_eq!(params.nodes, Some(50_000));
        assert_eq!(params.movetime_ms, Some(300));
    }
}
