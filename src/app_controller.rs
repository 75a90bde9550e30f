use anyhow::{anyhow, Result};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::converter::{run_job, ConversionJob, ConversionOutcome};
use crate::errors::ConversionError;
use crate::exporter::NotebookFormat;
use crate::file_utils::FileManager;

// @module: Batch orchestration over a bounded worker pool

/// Outcome of one job as reported by the pool
pub type JobResult = (ConversionJob, Result<ConversionOutcome, ConversionError>);

/// Counts for a finished batch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    /// Jobs discovered by the scan
    pub discovered: usize,
    /// Targets written
    pub converted: usize,
    /// Targets already up to date
    pub skipped: usize,
    /// Jobs that failed
    pub failed: usize,
    /// Sources of the failed jobs
    pub failed_files: Vec<PathBuf>,
    /// Wall-clock time of the batch
    pub duration: Duration,
}

impl BatchSummary {
    fn from_results(results: &[JobResult], duration: Duration) -> Self {
        let mut summary = Self {
            discovered: results.len(),
            duration,
            ..Self::default()
        };

        for (job, result) in results {
            match result {
                Ok(ConversionOutcome::Converted { .. }) => summary.converted += 1,
                Ok(ConversionOutcome::Skipped { .. }) => summary.skipped += 1,
                Err(_) => {
                    summary.failed += 1;
                    summary.failed_files.push(job.source.clone());
                }
            }
        }

        summary
    }
}

/// Run `handler` over every job with at most `workers` jobs in flight.
///
/// Each job runs on the blocking pool, so a job that blocks on I/O holds
/// only its own slot. A panicking handler is reported as
/// `ConversionError::Worker` for that job alone. Results come back in
/// completion order.
pub async fn run_jobs<F>(
    jobs: Vec<ConversionJob>,
    workers: usize,
    handler: F,
    progress: &ProgressBar,
) -> Vec<JobResult>
where
    F: Fn(&ConversionJob) -> Result<ConversionOutcome, ConversionError> + Send + Sync + 'static,
{
    let handler = Arc::new(handler);

    stream::iter(jobs)
        .map(|job| {
            let handler = handler.clone();
            async move {
                let task_job = job.clone();
                let result = tokio::task::spawn_blocking(move || (*handler)(&task_job))
                    .await
                    .unwrap_or_else(|e| {
                        error!("Error converting {}: worker failed: {}", job.file_name(), e);
                        Err(ConversionError::Worker(e.to_string()))
                    });
                (job, result)
            }
        })
        .buffer_unordered(workers.max(1))
        .inspect(|_| progress.inc(1))
        .collect::<Vec<_>>()
        .await
}

/// Main application controller for batch conversion
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    // @returns: Format whose extension the scanner matches
    fn scan_format(&self) -> NotebookFormat {
        // Unknown labels still scan notebooks; each job then fails resolution
        NotebookFormat::from_label(&self.config.from_format).unwrap_or(NotebookFormat::Notebook)
    }

    /// Build one job per candidate file under `root` (or for `root` itself
    /// when it is a file).
    pub fn discover_jobs(&self, root: &Path) -> Result<Vec<ConversionJob>> {
        let new_job = |path: PathBuf| ConversionJob::new(path, &self.config.from_format, &self.config.to_format);

        if FileManager::file_exists(root) {
            return Ok(vec![new_job(root.to_path_buf())]);
        }

        if !FileManager::dir_exists(root) {
            return Err(anyhow!("Input path does not exist: {:?}", root));
        }

        let files = FileManager::find_files(root, self.scan_format().extension(), &self.config.exclude_dirs)?;
        Ok(files.into_iter().map(new_job).collect())
    }

    /// Convert every candidate file under `root`.
    ///
    /// Individual file failures are logged and counted; only a missing root
    /// or an unreadable directory tree makes this return an error.
    pub async fn run(&self, root: &Path) -> Result<BatchSummary> {
        let start_time = Instant::now();
        let jobs = self.discover_jobs(root)?;

        if jobs.is_empty() {
            warn!("No .{} files found in {}", self.scan_format(), root.display());
            return Ok(BatchSummary {
                duration: start_time.elapsed(),
                ..BatchSummary::default()
            });
        }

        info!(
            "Found {} .{} files, converting {} -> {} with {} workers",
            jobs.len(),
            self.scan_format(),
            self.config.from_format,
            self.config.to_format,
            self.config.workers
        );

        let progress = self.create_progress_bar(jobs.len() as u64);
        let force_overwrite = self.config.force_overwrite;
        let results = run_jobs(
            jobs,
            self.config.workers,
            move |job| run_job(job, force_overwrite),
            &progress,
        )
        .await;
        progress.finish_and_clear();

        let summary = BatchSummary::from_results(&results, start_time.elapsed());
        info!(
            "Conversion completed: {} converted, {} skipped, {} failed in {}",
            summary.converted,
            summary.skipped,
            summary.failed,
            Self::format_duration(summary.duration)
        );

        Ok(summary)
    }

    fn create_progress_bar(&self, len: u64) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }

        let progress_bar = ProgressBar::new(len);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("=>-"));
        progress_bar.set_message("Converting");
        progress_bar
    }

    // Format duration in a human-readable format
    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;

        if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
