use env_logger::{Env, Target};
use homemade_strategies::uci::uci_top::run_stdio_loop;

fn main() -> std::io::Result<()> {
    // stdout carries the UCI protocol, so logs go to stderr.
    env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
        .target(Target::Stderr)
        .init();
    run_stdio_loop()
}
