/*!
 * Core document model for notebook conversion.
 *
 * A `NotebookDocument` is the in-memory form both codecs read into and
 * render from. It keeps only what survives a round trip through the
 * script layout: cell kinds, sources, ids and metadata.
 */

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// nbformat major version written and accepted
pub const NBFORMAT: u32 = 4;

/// nbformat minor version used when a script carries no header
pub const NBFORMAT_MINOR: u32 = 5;

/// Kind of a notebook cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    /// Prose rendered as markdown
    Markdown,
    /// Executable source
    Code,
    /// Text passed through untouched by the kernel
    Raw,
}

impl CellKind {
    /// nbformat `cell_type` string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::Code => "code",
            Self::Raw => "raw",
        }
    }
}

/// Single notebook cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// Cell kind
    pub kind: CellKind,

    /// Cell id (nbformat >= 4.5)
    pub id: Option<String>,

    /// Full source text, lines joined with `\n`
    pub source: String,

    /// Cell metadata object (tags, collapsed state, ...)
    pub metadata: Map<String, Value>,
}

impl Cell {
    /// Create a cell with no id and empty metadata
    pub fn new(kind: CellKind, source: impl Into<String>) -> Self {
        Self {
            kind,
            id: None,
            source: source.into(),
            metadata: Map::new(),
        }
    }

    pub fn code(source: impl Into<String>) -> Self {
        Self::new(CellKind::Code, source)
    }

    pub fn markdown(source: impl Into<String>) -> Self {
        Self::new(CellKind::Markdown, source)
    }

    /// Attach metadata to the cell.
    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Complete notebook document.
///
/// Cell order is significant and is preserved by both codecs.
#[derive(Debug, Clone, PartialEq)]
pub struct NotebookDocument {
    /// Ordered cells
    pub cells: Vec<Cell>,

    /// Notebook-level metadata (kernelspec, language_info, ...)
    pub metadata: Map<String, Value>,

    /// nbformat major version
    pub nbformat: u32,

    /// nbformat minor version
    pub nbformat_minor: u32,
}

impl NotebookDocument {
    /// Create a document from cells with default metadata and version.
    pub fn from_cells(cells: Vec<Cell>) -> Self {
        Self {
            cells,
            metadata: Map::new(),
            nbformat: NBFORMAT,
            nbformat_minor: NBFORMAT_MINOR,
        }
    }

    /// Whether the version requires every cell to carry an id
    pub fn requires_cell_ids(&self) -> bool {
        self.nbformat > 4 || (self.nbformat == 4 && self.nbformat_minor >= 5)
    }

    /// Number of cells of the given kind
    pub fn count(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|c| c.kind == kind).count()
    }
}

impl Default for NotebookDocument {
    fn default() -> Self {
        Self::from_cells(Vec::new())
    }
}
