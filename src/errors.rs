/*!
 * Error types for the nbconv application.
 *
 * Codec failures are reported as `NotebookError`, per-file conversion
 * failures as `ConversionError`. Orchestration-level failures use
 * `anyhow` in the controller and in `main`.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while parsing or rendering a notebook representation
#[derive(Error, Debug)]
pub enum NotebookError {
    /// The notebook JSON could not be parsed or produced
    #[error("Invalid notebook JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Only nbformat v4 documents are supported
    #[error("Unsupported nbformat version: {0}")]
    UnsupportedVersion(u32),

    /// The script header block is unterminated or not valid JSON
    #[error("Invalid script header: {0}")]
    Header(String),

    /// A cell marker carries metadata that is not a JSON object
    #[error("Invalid cell metadata on line {line}: {message}")]
    CellMetadata {
        /// 1-based line number of the cell marker
        line: usize,
        /// Parser message
        message: String,
    },
}

/// Errors that can occur while converting a single file
#[derive(Error, Debug)]
pub enum ConversionError {
    /// The requested (from, to) pair is not a supported direction
    #[error("Can't convert {from} to {to}")]
    InvalidFormatPair {
        /// Requested source format label
        from: String,
        /// Requested target format label
        to: String,
    },

    /// The source could not be read or is malformed
    #[error("Failed to read {}: {message}", path.display())]
    Read {
        /// Source path
        path: PathBuf,
        /// Underlying error message
        message: String,
    },

    /// The target representation could not be produced
    #[error("Failed to transform {}: {message}", path.display())]
    Transform {
        /// Source path
        path: PathBuf,
        /// Underlying error message
        message: String,
    },

    /// The target could not be written
    #[error("Failed to write {}: {message}", path.display())]
    Write {
        /// Target path
        path: PathBuf,
        /// Underlying error message
        message: String,
    },

    /// The worker running the job panicked or was aborted
    #[error("Worker failed: {0}")]
    Worker(String),
}
