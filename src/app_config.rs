/*!
 * Application configuration.
 *
 * Loads, validates and defaults the converter settings. Every field is
 * optional in the JSON file.
 */

use anyhow::{anyhow, Context, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Converter settings read from `nbconv.json` and overridden by CLI flags
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source format label (e.g. "ipynb", "notebook", "py")
    #[serde(default = "default_from_format")]
    pub from_format: String,

    /// Target format label
    #[serde(default = "default_to_format")]
    pub to_format: String,

    /// Worker pool size
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Convert even when the target is newer than the source
    #[serde(default)]
    pub force_overwrite: bool,

    /// Directory names the scanner does not descend into
    #[serde(default = "default_exclude_dirs")]
    pub exclude_dirs: Vec<String>,

    /// Show a progress bar while converting
    #[serde(default = "default_true")]
    pub show_progress: bool,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Optional file that receives a copy of every log line
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching `log` filter
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn default_from_format() -> String {
    "ipynb".to_string()
}

fn default_to_format() -> String {
    "py".to_string()
}

fn default_workers() -> usize {
    4
}

fn default_exclude_dirs() -> Vec<String> {
    vec![".ipynb_checkpoints".to_string()]
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a JSON file, or defaults when the file is absent
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let file = File::open(path)
            .context(format!("Failed to open config file: {}", path.display()))?;
        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    ///
    /// Format labels are only checked for presence here; an unsupported pair
    /// is reported per file by the converter.
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(anyhow!("Worker count must be a positive integer"));
        }

        if self.from_format.trim().is_empty() {
            return Err(anyhow!("Source format must not be empty"));
        }

        if self.to_format.trim().is_empty() {
            return Err(anyhow!("Target format must not be empty"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            from_format: default_from_format(),
            to_format: default_to_format(),
            workers: default_workers(),
            force_overwrite: false,
            exclude_dirs: default_exclude_dirs(),
            show_progress: default_true(),
            log_level: LogLevel::default(),
            log_file: None,
        }
    }
}
