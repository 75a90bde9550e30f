/*!
 * Notebook document model and its two on-disk representations.
 *
 * - `model`: the in-memory `NotebookDocument`
 * - `ipynb`: nbformat v4 JSON
 * - `script`: percent-style Python script with cell markers
 */

pub mod ipynb;
pub mod model;
pub mod script;

// Re-export types used by other modules
pub use model::{Cell, CellKind, NotebookDocument};
