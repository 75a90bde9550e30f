// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use std::path::PathBuf;

use nbconv::app_config::{Config, LogLevel};
use nbconv::app_logger::AppLogger;
use nbconv::Controller;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert notebooks under a directory (default command)
    Convert(ConvertArgs),

    /// Generate shell completions for nbconv
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone)]
struct ConvertArgs {
    /// Root directory to scan, or a single file to convert
    #[arg(value_name = "ROOT", default_value = ".")]
    root: PathBuf,

    /// Format to convert from (ipynb, notebook, py, python)
    #[arg(short, long, visible_alias = "format-from")]
    from_format: Option<String>,

    /// Format to convert to (py, python, ipynb, notebook)
    #[arg(short, long, visible_alias = "format-to")]
    to_format: Option<String>,

    /// Number of parallel workers
    #[arg(short, long, value_parser = parse_workers)]
    workers: Option<usize>,

    /// Convert even when the target is newer than the source
    #[arg(long)]
    force: bool,

    /// Configuration file path
    #[arg(short, long = "config", default_value = "nbconv.json")]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Do not draw a progress bar
    #[arg(long)]
    no_progress: bool,
}

impl ConvertArgs {
    /// Override config values with the flags that were given
    fn apply_to(&self, config: &mut Config) {
        if let Some(from_format) = &self.from_format {
            config.from_format = from_format.clone();
        }
        if let Some(to_format) = &self.to_format {
            config.to_format = to_format.clone();
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if self.force {
            config.force_overwrite = true;
        }
        if let Some(log_level) = &self.log_level {
            config.log_level = log_level.clone().into();
        }
        if self.no_progress {
            config.show_progress = false;
        }
    }
}

fn parse_workers(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("worker count must be at least 1".to_string()),
        Ok(workers) => Ok(workers),
        Err(e) => Err(e.to_string()),
    }
}

/// nbconv - Notebook Format Converter
///
/// Recursively converts Jupyter notebooks to percent-style Python scripts,
/// or scripts back to notebooks, skipping targets that are already up to date.
#[derive(Parser, Debug)]
#[command(name = "nbconv")]
#[command(version)]
#[command(about = "Batch converter between Jupyter notebooks and Python scripts")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "nbconv walks a directory tree and converts every notebook it finds.

EXAMPLES:
    nbconv                                   # Convert all notebooks under the current directory
    nbconv docs/ -w 8                        # Use eight workers
    nbconv docs/ -f py -t ipynb              # Convert scripts back to notebooks
    nbconv docs/lesson.ipynb --force         # Reconvert a single notebook
    nbconv completions bash > nbconv.bash    # Generate bash completions

CONFIGURATION:
    Settings are read from nbconv.json when it exists. Command line flags
    override values from the file.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    args: ConvertArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = CommandLineOptions::parse();

    let args = match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "nbconv", &mut std::io::stdout());
            return Ok(());
        }
        Some(Commands::Convert(args)) => args,
        None => cli.args,
    };

    run_convert(args).await
}

async fn run_convert(args: ConvertArgs) -> Result<()> {
    let mut config = Config::load_or_default(&args.config_path)?;
    args.apply_to(&mut config);

    AppLogger::init(config.log_level.to_level_filter(), config.log_file.as_deref())?;

    let controller = Controller::with_config(config)?;
    controller.run(&args.root).await?;

    Ok(())
}
