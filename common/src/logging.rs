//! Process-wide logger construction.
//!
//! Library crates never build their own `Logger` - one is built once in each
//! binary's `main` and threaded down through every constructor, the same way
//! `gnb-cu-cp::worker::Worker` and `mocks::mock_du::MockDu` take a `Logger`
//! argument rather than reaching for a global.

use slog::{o, Drain, Logger};

/// Build the terminal + async drain stack used by every `gnb-*` binary.
///
/// `slog-envlogger` lets `RUST_LOG`/`SLOG_ENVLOGGER` style filters select a
/// verbosity without recompiling.
pub fn build_logger(component: &'static str) -> Logger {
    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_envlogger::new(drain);
    let drain = slog_async::Async::new(drain).build().fuse();
    Logger::root(drain, o!("component" => component))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn builds_without_panicking() {
        let logger = build_logger("test");
        slog::info!(logger, "hello");
    }
}
