//! Rolling Logger
//!
//! A `log::Log` implementation that keeps the last N formatted lines in a
//! circular buffer and forwards each line to a sink (the browser console in
//! the app, a capture buffer in tests).

use std::collections::VecDeque;
use std::sync::{Mutex, OnceLock};

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Where formatted lines go besides the buffer
pub type Sink = fn(Level, &str);

pub struct RollingLogger {
    capacity: usize,
    level: LevelFilter,
    sink: Sink,
    lines: Mutex<VecDeque<String>>,
}

impl RollingLogger {
    pub fn new(capacity: usize, level: LevelFilter, sink: Sink) -> Self {
        Self {
            capacity: capacity.max(1),
            level,
            sink,
            lines: Mutex::new(VecDeque::with_capacity(capacity.max(1))),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
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

    /// Buffered lines, oldest first
    pub fn recent(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.iter().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn clear(&self) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.clear();
        }
    }
}

fn format_line(record: &Record) -> String {
    format!(
        "[{}] {:<5} {}: {}",
        chrono::Local::now().format("%H:%M:%S%.3f"),
        record.level(),
        record.target(),
        record.args()
    )
}

impl Log for RollingLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(record);
        (self.sink)(record.level(), &line);
        self.push(line);
    }

    fn flush(&self) {}
}

static LOGGER: OnceLock<RollingLogger> = OnceLock::new();

/// Install the global logger. A second call fails like `log::set_logger`.
pub fn init_logger(capacity: usize, level: LevelFilter, sink: Sink) -> Result<(), SetLoggerError> {
    let logger = LOGGER.get_or_init(|| RollingLogger::new(capacity, level, sink));
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}

/// Lines buffered by the global logger
pub fn recent() -> Vec<String> {
    LOGGER.get().map(RollingLogger::recent).unwrap_or_default()
}

pub fn info(message: &str) {
    log::info!("{}", message);
}

pub fn error(message: &str) {
    log::error!("{}", message);
}
