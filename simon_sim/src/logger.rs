//! Log sink for the simulator.
//!
//! The terminal belongs to the TUI, so records are kept in memory and drawn in the log pane.

use std::{collections::VecDeque, sync::Mutex};

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Records kept for the log pane.
pub const CAPACITY: usize = 256;

#[derive(Debug)]
pub struct LogRing {
    lines: Mutex<VecDeque<String>>,
    capacity: usize,
}

impl LogRing {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    fn push(&self, line: String) {
        let Ok(mut lines) = self.lines.lock() else {
            return;
        };
        if lines.len() == self.capacity {
            lines.pop_front();
        }
        lines.push_back(line);
    }

    /// The last `n` lines, oldest first.
    pub fn tail(&self, n: usize) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.iter().skip(lines.len().saturating_sub(n)).cloned().collect(),
            Err(_) => Vec::new(),
        }
    }
}

impl Log for LogRing {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let target = record.target();
        let target = target.rsplit("::").next().unwrap_or(target);
        self.push(format!("{:<5} {}: {}", record.level(), target, record.args()));
    }

    fn flush(&self) {}
}

/// Install a [`LogRing`] as the global logger.
pub fn install(level: LevelFilter) -> Result<&'static LogRing, SetLoggerError> {
    let ring: &'static LogRing = Box::leak(Box::new(LogRing::new(CAPACITY)));
    log::set_logger(ring)?;
    log::set_max_level(level);
    Ok(ring)
}

#[cfg(test)]
mod tests {
    use log::Level;

    use super::*;

    fn record(ring: &LogRing, level: Level, message: &str) {
        ring.log(
            &Record::builder()
                .level(level)
                .target("simon_core::game")
                .args(format_args!("{message}"))
                .build(),
        );
    }

    #[test]
    fn keeps_the_newest_lines() {
        log::set_max_level(LevelFilter::Trace);
        let ring = LogRing::new(2);
        record(&ring, Level::Info, "one");
        record(&ring, Level::Info, "two");
        record(&ring, Level::Warn, "three");

        assert_eq!(ring.tail(5), vec!["INFO  game: two", "WARN  game: three"]);
        assert_eq!(ring.tail(1), vec!["WARN  game: three"]);
        assert!(ring.tail(0).is_empty());
    }

    #[test]
    fn second_install_is_an_error() {
        let _ = install(LevelFilter::Info);
        let error: anyhow::Error = install(LevelFilter::Info).unwrap_err().into();
        assert!(!error.to_string().is_empty());
    }
}
