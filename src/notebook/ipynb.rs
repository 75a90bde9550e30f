/*!
 * nbformat v4 JSON codec.
 *
 * Reads `.ipynb` documents into a `NotebookDocument` and writes them back
 * the way Jupyter does: one-space indentation, sorted keys, sources split
 * into lines, and a trailing newline.
 */

use serde::{Deserialize, Serialize};
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::{Map, Value, json};

use super::model::{Cell, CellKind, NBFORMAT, NotebookDocument};
use crate::errors::NotebookError;

#[derive(Deserialize)]
struct RawNotebook {
    #[serde(default)]
    cells: Vec<RawCell>,
    #[serde(default)]
    metadata: Map<String, Value>,
    nbformat: u32,
    #[serde(default)]
    nbformat_minor: u32,
}

#[derive(Deserialize)]
struct RawCell {
    cell_type: CellKind,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    metadata: Map<String, Value>,
    #[serde(default)]
    source: MultilineText,
}

// nbformat allows either a single string or a list of line strings
#[derive(Deserialize)]
#[serde(untagged)]
enum MultilineText {
    Text(String),
    Lines(Vec<String>),
}

impl Default for MultilineText {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl MultilineText {
    fn into_string(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Lines(lines) => lines.concat(),
        }
    }
}

/// Parse notebook JSON text into a document.
pub fn parse(text: &str) -> Result<NotebookDocument, NotebookError> {
    let raw: RawNotebook = serde_json::from_str(text)?;

    if raw.nbformat != NBFORMAT {
        return Err(NotebookError::UnsupportedVersion(raw.nbformat));
    }

    let cells = raw
        .cells
        .into_iter()
        .map(|cell| Cell {
            kind: cell.cell_type,
            id: cell.id,
            source: cell.source.into_string(),
            metadata: cell.metadata,
        })
        .collect();

    Ok(NotebookDocument {
        cells,
        metadata: raw.metadata,
        nbformat: raw.nbformat,
        nbformat_minor: raw.nbformat_minor,
    })
}

/// Render a document as notebook JSON text.
pub fn render(doc: &NotebookDocument) -> Result<String, NotebookError> {
    let with_ids = doc.requires_cell_ids();
    let cells: Vec<Value> = doc
        .cells
        .iter()
        .enumerate()
        .map(|(index, cell)| render_cell(index, cell, with_ids))
        .collect();

    let notebook = json!({
        "cells": cells,
        "metadata": doc.metadata,
        "nbformat": doc.nbformat,
        "nbformat_minor": doc.nbformat_minor,
    });

    let mut buffer = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b" "));
    notebook.serialize(&mut serializer)?;
    buffer.push(b'\n');

    String::from_utf8(buffer)
        .map_err(|e| NotebookError::Json(<serde_json::Error as serde::ser::Error>::custom(e)))
}

fn render_cell(index: usize, cell: &Cell, with_ids: bool) -> Value {
    let mut object = Map::new();
    object.insert("cell_type".to_string(), json!(cell.kind.as_str()));
    object.insert("metadata".to_string(), Value::Object(cell.metadata.clone()));
    object.insert("source".to_string(), json!(split_source(&cell.source)));

    if let Some(id) = cell.id.clone().or_else(|| with_ids.then(|| generated_id(index))) {
        object.insert("id".to_string(), json!(id));
    }

    if cell.kind == CellKind::Code {
        object.insert("execution_count".to_string(), Value::Null);
        object.insert("outputs".to_string(), json!([]));
    }

    Value::Object(object)
}

/// Deterministic id so repeated conversions produce identical files
fn generated_id(index: usize) -> String {
    format!("cell-{}", index)
}

/// Split source into nbformat lines, every line but the last keeping its `\n`
fn split_source(source: &str) -> Vec<&str> {
    source.split_inclusive('\n').collect()
}
