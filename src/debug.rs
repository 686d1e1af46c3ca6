//! Log sink for the `glyphgrid` binary.
//!
//! The library crates only talk to the `log` facade. This module installs the
//! process-wide `log::Log` implementation that turns those records into
//! timestamped lines on stderr, or in a log file when one is given.
//!
//! The level comes from the `--log-level` flag, falling back to the
//! `GLYPHGRID_LOG` environment variable (off, error, warn, info, debug, trace).
//! Unset or unparseable values leave logging at `warn`.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;

/// Environment variable consulted when no CLI level is given.
pub const LOG_ENV_VAR: &str = "GLYPHGRID_LOG";

/// Debug level configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum DebugLevel {
    Off,
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl DebugLevel {
    /// Level from `GLYPHGRID_LOG`, if set to a known name.
    pub fn from_env() -> Option<Self> {
        std::env::var(LOG_ENV_VAR).ok()?.parse().ok()
    }

    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            DebugLevel::Off => log::LevelFilter::Off,
            DebugLevel::Error => log::LevelFilter::Error,
            DebugLevel::Warn => log::LevelFilter::Warn,
            DebugLevel::Info => log::LevelFilter::Info,
            DebugLevel::Debug => log::LevelFilter::Debug,
            DebugLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

impl FromStr for DebugLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" | "0" => Ok(DebugLevel::Off),
            "error" | "1" => Ok(DebugLevel::Error),
            "warn" | "warning" => Ok(DebugLevel::Warn),
            "info" | "2" => Ok(DebugLevel::Info),
            "debug" | "3" => Ok(DebugLevel::Debug),
            "trace" | "4" => Ok(DebugLevel::Trace),
            other => Err(format!("unknown log level '{other}'")),
        }
    }
}

impl fmt::Display for DebugLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DebugLevel::Off => "off",
            DebugLevel::Error => "error",
            DebugLevel::Warn => "warn",
            DebugLevel::Info => "info",
            DebugLevel::Debug => "debug",
            DebugLevel::Trace => "trace",
        };
        f.write_str(name)
    }
}

/// Where formatted lines go.
enum Sink {
    Stderr,
    File(File),
}

impl Sink {
    fn write_raw(&mut self, msg: &str) {
        // Logging must never take the process down
        match self {
            Sink::Stderr => {
                let _ = std::io::stderr().write_all(msg.as_bytes());
            }
            Sink::File(file) => {
                let _ = file.write_all(msg.as_bytes());
                let _ = file.flush();
            }
        }
    }
}

/// The installed `log::Log` implementation.
struct DebugLogger {
    level: log::LevelFilter,
    sink: Mutex<Sink>,
}

impl log::Log for DebugLogger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &log::Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(&get_timestamp(), record.level(), record.target(), record.args());
        self.sink.lock().write_raw(&line);
    }

    fn flush(&self) {
        if let Sink::File(file) = &mut *self.sink.lock() {
            let _ = file.flush();
        }
    }
}

static LOGGER: OnceLock<DebugLogger> = OnceLock::new();

fn get_timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

fn format_line(timestamp: &str, level: log::Level, target: &str, args: &fmt::Arguments<'_>) -> String {
    format!("[{timestamp}] [{level:<5}] [{target}] {args}\n")
}

/// Resolve the effective level: CLI flag first, then the environment.
pub fn effective_level(cli_level: Option<DebugLevel>) -> DebugLevel {
    cli_level.or_else(DebugLevel::from_env).unwrap_or_default()
}

/// Install the logger. Later calls are ignored.
///
/// With `log_file` set, lines are appended to that file; if it cannot be
/// opened the logger falls back to stderr.
pub fn init_log_bridge(cli_level: Option<DebugLevel>, log_file: Option<&Path>) {
    let level = effective_level(cli_level).to_level_filter();
    let sink = match log_file {
        Some(path) => match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Sink::File(file),
            Err(e) => {
                eprintln!("glyphgrid: cannot open log file {}: {e}", path.display());
                Sink::Stderr
            }
        },
        None => Sink::Stderr,
    };

    let logger = LOGGER.get_or_init(|| DebugLogger {
        level,
        sink: Mutex::new(sink),
    });
    if log::set_logger(logger).is_ok() {
        log::set_max_level(logger.level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_names_parse_case_insensitively() {
        assert_eq!("TRACE".parse::<DebugLevel>(), Ok(DebugLevel::Trace));
        assert_eq!(" warn ".parse::<DebugLevel>(), Ok(DebugLevel::Warn));
        assert_eq!("3".parse::<DebugLevel>(), Ok(DebugLevel::Debug));
        assert!("loud".parse::<DebugLevel>().is_err());
    }

    #[test]
    fn cli_level_wins_over_default() {
        assert_eq!(effective_level(Some(DebugLevel::Off)), DebugLevel::Off);
        assert_eq!(
            DebugLevel::Debug.to_level_filter(),
            log::LevelFilter::Debug
        );
    }

    #[test]
    fn lines_carry_level_and_target() {
        let line = format_line(
            "1.000000",
            log::Level::Info,
            "glyphgrid_render::context",
            &format_args!("cell {}x{}", 12, 20),
        );
        assert_eq!(line, "[1.000000] [INFO ] [glyphgrid_render::context] cell 12x20\n");
    }

    #[test]
    fn display_round_trips_through_parse() {
        for level in [
            DebugLevel::Off,
            DebugLevel::Error,
            DebugLevel::Warn,
            DebugLevel::Info,
            DebugLevel::Debug,
            DebugLevel::Trace,
        ] {
            assert_eq!(level.to_string().parse::<DebugLevel>(), Ok(level));
        }
    }
}
