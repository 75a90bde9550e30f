use std::fmt;

use crate::errors::{ConversionError, NotebookError};
use crate::notebook::{NotebookDocument, ipynb, script};

// @module: Format resolution and exporter selection

/// One of the two supported on-disk representations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotebookFormat {
    // @format: Percent-style Python script
    Script,
    // @format: nbformat JSON notebook
    Notebook,
}

impl NotebookFormat {
    // @returns: File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Script => "py",
            Self::Notebook => "ipynb",
        }
    }

    /// Resolve a user-supplied label, case-insensitively.
    ///
    /// Accepts `python`/`py`/`.py` and `notebook`/`ipynb`/`.ipynb`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "python" | "py" | ".py" => Some(Self::Script),
            "notebook" | "ipynb" | ".ipynb" => Some(Self::Notebook),
            _ => None,
        }
    }
}

impl fmt::Display for NotebookFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Conversion direction, resolved once per job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExporterChoice {
    /// `.ipynb` -> `.py`
    NotebookToScript,
    /// `.py` -> `.ipynb`
    ScriptToNotebook,
}

impl ExporterChoice {
    pub fn source_format(&self) -> NotebookFormat {
        match self {
            Self::NotebookToScript => NotebookFormat::Notebook,
            Self::ScriptToNotebook => NotebookFormat::Script,
        }
    }

    pub fn target_format(&self) -> NotebookFormat {
        match self {
            Self::NotebookToScript => NotebookFormat::Script,
            Self::ScriptToNotebook => NotebookFormat::Notebook,
        }
    }

    pub fn source_extension(&self) -> &'static str {
        self.source_format().extension()
    }

    pub fn target_extension(&self) -> &'static str {
        self.target_format().extension()
    }

    /// Parse `input` in the source representation and render it in the target one.
    pub fn export(&self, input: &str) -> Result<String, NotebookError> {
        let document = self.read(input)?;
        self.render(&document)
    }

    /// Parse step of `export`, split out so callers can tell read failures apart
    pub fn read(&self, input: &str) -> Result<NotebookDocument, NotebookError> {
        match self {
            Self::NotebookToScript => ipynb::parse(input),
            Self::ScriptToNotebook => script::parse(input),
        }
    }

    /// Render step of `export`
    pub fn render(&self, document: &NotebookDocument) -> Result<String, NotebookError> {
        match self {
            Self::NotebookToScript => script::render(document),
            Self::ScriptToNotebook => ipynb::render(document),
        }
    }
}

/// Map a `(from, to)` label pair to a conversion direction.
///
/// Every pair other than script/notebook in either direction, including
/// same-to-same pairs and unknown labels, is an `InvalidFormatPair`.
pub fn resolve_exporter(from_format: &str, to_format: &str) -> Result<ExporterChoice, ConversionError> {
    match (NotebookFormat::from_label(from_format), NotebookFormat::from_label(to_format)) {
        (Some(NotebookFormat::Notebook), Some(NotebookFormat::Script)) => Ok(ExporterChoice::NotebookToScript),
        (Some(NotebookFormat::Script), Some(NotebookFormat::Notebook)) => Ok(ExporterChoice::ScriptToNotebook),
        _ => Err(ConversionError::InvalidFormatPair {
            from: from_format.to_string(),
            to: to_format.to_string(),
        }),
    }
}
