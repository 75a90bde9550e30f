/*!
 * Process-wide logger.
 *
 * Installed once at startup and shared by every worker through the `log`
 * macros. Each record is formatted into a complete line before any sink is
 * touched, and each sink is written one whole line per lock acquisition, so
 * concurrent workers never interleave partial lines.
 */

use anyhow::{Context, Result};
use log::{Level, LevelFilter, Log, Metadata, Record};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

// @struct: Logger writing colored lines to stderr and plain lines to an optional file
pub struct AppLogger {
    level: LevelFilter,
    file: Option<Mutex<File>>,
}

impl AppLogger {
    // @creates: Logger, opening the log file in append mode when given
    pub fn new(level: LevelFilter, log_file: Option<&Path>) -> Result<Self> {
        let file = match log_file {
            Some(path) => {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .with_context(|| format!("Failed to open log file: {:?}", path))?;
                Some(Mutex::new(file))
            }
            None => None,
        };

        Ok(Self { level, file })
    }

    // @initializes: Global logger
    pub fn init(level: LevelFilter, log_file: Option<&Path>) -> Result<()> {
        let logger = Box::new(Self::new(level, log_file)?);
        log::set_boxed_logger(logger).context("Logger already initialized")?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }

    /// Plain log line without color or trailing newline
    pub fn format_line(record: &Record) -> String {
        let now = chrono::Local::now().format("%H:%M:%S%.3f");
        format!("{} {:<5} {}", now, record.level(), record.args())
    }
}

impl Log for AppLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = Self::format_line(record);
        let colored = format!("{}{}\x1B[0m\n", Self::color_for_level(record.level()), line);
        {
            let mut stderr = std::io::stderr().lock();
            let _ = stderr.write_all(colored.as_bytes());
        }

        if let Some(file) = &self.file {
            let date = chrono::Local::now().format("%Y-%m-%d");
            let mut file = file.lock();
            let _ = writeln!(file, "{} {}", date, line);
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
        if let Some(file) = &self.file {
            let _ = file.lock().flush();
        }
    }
}
