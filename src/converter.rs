/*!
 * Single-file conversion.
 *
 * `convert_file` does the work for one job and reports failures as
 * `ConversionError`; `run_job` wraps it with the per-file log line and is
 * what the batch orchestrator runs on each worker.
 */

use log::{debug, error, info};
use std::path::{Path, PathBuf};

use crate::errors::ConversionError;
use crate::exporter::resolve_exporter;
use crate::file_utils::FileManager;

/// One file to convert, discovered at batch start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    /// Source document
    pub source: PathBuf,
    /// Requested source format label
    pub from_format: String,
    /// Requested target format label
    pub to_format: String,
}

impl ConversionJob {
    pub fn new(source: impl Into<PathBuf>, from_format: &str, to_format: &str) -> Self {
        Self {
            source: source.into(),
            from_format: from_format.to_string(),
            to_format: to_format.to_string(),
        }
    }

    // @returns: Source file name for log lines
    pub fn file_name(&self) -> String {
        FileManager::display_name(&self.source)
    }
}

/// Result of a job that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionOutcome {
    /// The target was written
    Converted { target: PathBuf },
    /// The target was already newer than the source
    Skipped { target: PathBuf },
}

impl ConversionOutcome {
    pub fn target(&self) -> &Path {
        match self {
            Self::Converted { target } | Self::Skipped { target } => target,
        }
    }
}

/// Convert one file end to end.
///
/// Resolution happens before any filesystem access, so an unsupported
/// format pair neither reads nor writes. The target is only ever replaced
/// atomically.
pub fn convert_file(job: &ConversionJob, force_overwrite: bool) -> Result<ConversionOutcome, ConversionError> {
    let exporter = resolve_exporter(&job.from_format, &job.to_format)?;
    let target = FileManager::sibling_with_extension(&job.source, exporter.target_extension());

    if !force_overwrite {
        let up_to_date = FileManager::is_up_to_date(&job.source, &target).map_err(|e| ConversionError::Read {
            path: job.source.clone(),
            message: format!("{:#}", e),
        })?;
        if up_to_date {
            return Ok(ConversionOutcome::Skipped { target });
        }
    }

    let input = FileManager::read_to_string(&job.source).map_err(|e| ConversionError::Read {
        path: job.source.clone(),
        message: format!("{:#}", e),
    })?;

    let document = exporter.read(&input).map_err(|e| ConversionError::Read {
        path: job.source.clone(),
        message: e.to_string(),
    })?;
    debug!("Parsed {} with {} cells", job.file_name(), document.cells.len());

    let output = exporter.render(&document).map_err(|e| ConversionError::Transform {
        path: job.source.clone(),
        message: e.to_string(),
    })?;

    FileManager::write_atomic(&target, &output).map_err(|e| ConversionError::Write {
        path: target.clone(),
        message: format!("{:#}", e),
    })?;

    Ok(ConversionOutcome::Converted { target })
}

/// Run one job and log its outcome.
///
/// Errors are logged here and handed back only so the caller can count them.
pub fn run_job(job: &ConversionJob, force_overwrite: bool) -> Result<ConversionOutcome, ConversionError> {
    let result = convert_file(job, force_overwrite);
    match &result {
        Ok(ConversionOutcome::Converted { .. }) => {
            info!("Successfully converted {}", job.file_name());
        }
        Ok(ConversionOutcome::Skipped { target }) => {
            info!(
                "Skipping {} - {} is up to date",
                job.file_name(),
                FileManager::display_name(target)
            );
        }
        Err(e) => {
            error!("Error converting {}: {}", job.file_name(), e);
        }
    }
    result
}
