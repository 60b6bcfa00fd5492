#![cfg(feature = "std")]

//! Stderr logger configured from `BROADSIDE_LOG`.
//!
//! The variable takes a default level plus optional per-module overrides,
//! e.g. `warn,broadside::hunter=debug`. The longest matching module prefix
//! wins.

use std::env;
use std::string::String;
use std::sync::OnceLock;
use std::vec::Vec;

use log::{Level, LevelFilter, Log, Metadata, Record};

/// Parsed `BROADSIDE_LOG` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFilter {
    default: LevelFilter,
    modules: Vec<(String, LevelFilter)>,
}

impl Default for LogFilter {
    fn default() -> Self {
        Self {
            default: LevelFilter::Info,
            modules: Vec::new(),
        }
    }
}

impl LogFilter {
    /// Parse a comma-separated list of `level` and `module=level` items.
    /// Unknown levels are skipped.
    pub fn parse(directives: &str) -> Self {
        let mut filter = Self::default();
        for item in directives.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match item.split_once('=') {
                Some((module, level)) => {
                    if let Ok(level) = level.trim().parse() {
                        filter.modules.push((module.trim().into(), level));
                    }
                }
                None => {
                    if let Ok(level) = item.parse() {
                        filter.default = level;
                    }
                }
            }
        }
        // longest prefix first
        filter.modules.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        filter
    }

    /// Level in force for `target`.
    pub fn level_for(&self, target: &str) -> LevelFilter {
        self.modules
            .iter()
            .find(|(module, _)| {
                target == module
                    || target
                        .strip_prefix(module.as_str())
                        .is_some_and(|rest| rest.starts_with("::"))
            })
            .map_or(self.default, |(_, level)| *level)
    }

    /// Whether a record at `level` from `target` passes.
    pub fn allows(&self, target: &str, level: Level) -> bool {
        level <= self.level_for(target)
    }

    /// Most verbose level any directive enables.
    pub fn max_level(&self) -> LevelFilter {
        self.modules
            .iter()
            .map(|(_, level)| *level)
            .fold(self.default, core::cmp::max)
    }
}

struct StderrLogger {
    filter: LogFilter,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.filter.allows(metadata.target(), metadata.level())
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            std::eprintln!("[{:<5}] {}: {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: OnceLock<StderrLogger> = OnceLock::new();

/// Install the stderr logger using `BROADSIDE_LOG`, defaulting to `info`.
/// Calling it twice is harmless.
pub fn init_logging() {
    let filter = env::var("BROADSIDE_LOG")
        .map(|directives| LogFilter::parse(&directives))
        .unwrap_or_default();
    let max = filter.max_level();
    let logger = LOGGER.get_or_init(|| StderrLogger { filter });
    if log::set_logger(logger).is_ok() {
        log::set_max_level(max);
    }
}
