/*!
 * Percent-style script codec.
 *
 * Layout:
 *
 * ```text
 * # ---
 * # {"metadata":{...},"nbformat":4,"nbformat_minor":5}
 * # ---
 *
 * # %% [markdown]
 * # Prose, commented line by line
 *
 * # %% {"tags":["setup"]}
 * import os
 * ```
 *
 * Code lines are written verbatim, markdown and raw lines are commented.
 * Cells are separated by a blank line and trailing blank lines of a cell
 * are not significant.
 *
 * A cell line that would read back as a marker is escaped with one more
 * `# ` prefix. Lines that already look escaped get the prefix too, so
 * unescaping on parse is exact.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value, json};

use super::model::{Cell, CellKind, NBFORMAT, NBFORMAT_MINOR, NotebookDocument};
use crate::errors::NotebookError;

/// Line opening and closing the notebook header block
pub const HEADER_FENCE: &str = "# ---";

/// Prefix of every cell marker line
pub const CELL_MARKER: &str = "# %%";

// Marker with optional [kind] and an optional trailing JSON object or title
static MARKER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#\s*%%(?:\s+\[([A-Za-z]+)\])?(?:\s+(.*?))?\s*$").unwrap()
});

#[derive(Deserialize)]
struct ScriptHeader {
    #[serde(default)]
    metadata: Map<String, Value>,
    #[serde(default = "default_nbformat")]
    nbformat: u32,
    #[serde(default = "default_nbformat_minor")]
    nbformat_minor: u32,
}

fn default_nbformat() -> u32 {
    NBFORMAT
}

fn default_nbformat_minor() -> u32 {
    NBFORMAT_MINOR
}

/// Cell being accumulated while scanning lines
struct PendingCell<'a> {
    kind: CellKind,
    metadata: Map<String, Value>,
    lines: Vec<&'a str>,
}

impl PendingCell<'_> {
    fn finish(self) -> Cell {
        let mut lines: Vec<&str> = self.lines.into_iter().map(unescape).collect();
        while lines.last().is_some_and(|line| line.trim().is_empty()) {
            lines.pop();
        }

        let source = match self.kind {
            CellKind::Code => lines.join("\n"),
            CellKind::Markdown | CellKind::Raw => lines
                .iter()
                .map(|line| uncomment(line))
                .collect::<Vec<_>>()
                .join("\n"),
        };

        Cell::new(self.kind, source).with_metadata(self.metadata)
    }
}

/// Parse script text into a document.
pub fn parse(text: &str) -> Result<NotebookDocument, NotebookError> {
    let lines: Vec<&str> = text.lines().collect();
    let mut doc = NotebookDocument::default();

    let body_start = match lines.first() {
        Some(first) if first.trim_end() == HEADER_FENCE && lines.get(1).is_some_and(|next| next.starts_with("# {")) => {
            let close = lines[1..]
                .iter()
                .position(|line| line.trim_end() == HEADER_FENCE)
                .map(|pos| pos + 1)
                .ok_or_else(|| NotebookError::Header("unterminated header block".to_string()))?;

            let header_text = lines[1..close]
                .iter()
                .map(|line| uncomment(line))
                .collect::<Vec<_>>()
                .join("\n");
            let header: ScriptHeader = serde_json::from_str(&header_text)
                .map_err(|e| NotebookError::Header(e.to_string()))?;

            if header.nbformat != NBFORMAT {
                return Err(NotebookError::UnsupportedVersion(header.nbformat));
            }
            doc.metadata = header.metadata;
            doc.nbformat = header.nbformat;
            doc.nbformat_minor = header.nbformat_minor;
            close + 1
        }
        _ => 0,
    };

    let mut preamble: Vec<&str> = Vec::new();
    let mut current: Option<PendingCell> = None;

    for (offset, &line) in lines[body_start..].iter().enumerate() {
        if let Some(caps) = MARKER_REGEX.captures(line) {
            if let Some(cell) = current.take() {
                doc.cells.push(cell.finish());
            }
            let kind = match caps.get(1).map(|m| m.as_str().to_lowercase()).as_deref() {
                Some("markdown") | Some("md") => CellKind::Markdown,
                Some("raw") => CellKind::Raw,
                _ => CellKind::Code,
            };
            let metadata = parse_marker_metadata(caps.get(2).map(|m| m.as_str()), body_start + offset + 1)?;
            current = Some(PendingCell {
                kind,
                metadata,
                lines: Vec::new(),
            });
        } else if let Some(cell) = current.as_mut() {
            cell.lines.push(line);
        } else {
            preamble.push(line);
        }
    }

    if let Some(cell) = current.take() {
        doc.cells.push(cell.finish());
    }

    // Plain code ahead of the first marker becomes a leading code cell
    if preamble.iter().any(|line| !line.trim().is_empty()) {
        let first = preamble.iter().position(|line| !line.trim().is_empty()).unwrap_or(0);
        let leading = PendingCell {
            kind: CellKind::Code,
            metadata: Map::new(),
            lines: preamble.split_off(first),
        };
        doc.cells.insert(0, leading.finish());
    }

    Ok(doc)
}

fn parse_marker_metadata(rest: Option<&str>, line: usize) -> Result<Map<String, Value>, NotebookError> {
    let rest = match rest.map(str::trim) {
        Some(rest) if !rest.is_empty() => rest,
        _ => return Ok(Map::new()),
    };

    if rest.starts_with('{') {
        match serde_json::from_str::<Value>(rest) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(NotebookError::CellMetadata {
                line,
                message: "expected a JSON object".to_string(),
            }),
            Err(e) => Err(NotebookError::CellMetadata {
                line,
                message: e.to_string(),
            }),
        }
    } else {
        let mut map = Map::new();
        map.insert("title".to_string(), json!(rest));
        Ok(map)
    }
}

/// Render a document as script text.
pub fn render(doc: &NotebookDocument) -> Result<String, NotebookError> {
    let header = json!({
        "metadata": doc.metadata,
        "nbformat": doc.nbformat,
        "nbformat_minor": doc.nbformat_minor,
    });

    let mut out = String::new();
    out.push_str(HEADER_FENCE);
    out.push('\n');
    out.push_str("# ");
    out.push_str(&serde_json::to_string(&header)?);
    out.push('\n');
    out.push_str(HEADER_FENCE);
    out.push('\n');

    for cell in &doc.cells {
        out.push('\n');
        out.push_str(&marker_line(cell)?);
        out.push('\n');

        for line in cell.source.lines() {
            let line = match cell.kind {
                CellKind::Code => line.to_string(),
                CellKind::Markdown | CellKind::Raw => comment(line),
            };
            out.push_str(&escape(&line));
            out.push('\n');
        }
    }

    Ok(out)
}

fn marker_line(cell: &Cell) -> Result<String, NotebookError> {
    let mut line = String::from(CELL_MARKER);
    match cell.kind {
        CellKind::Markdown => line.push_str(" [markdown]"),
        CellKind::Raw => line.push_str(" [raw]"),
        CellKind::Code => {}
    }
    if !cell.metadata.is_empty() {
        line.push(' ');
        line.push_str(&serde_json::to_string(&cell.metadata)?);
    }
    Ok(line)
}

fn comment(line: &str) -> String {
    if line.is_empty() {
        "#".to_string()
    } else {
        format!("# {}", line)
    }
}

// A marker, or a marker under any number of escape prefixes
fn needs_escape(line: &str) -> bool {
    MARKER_REGEX.is_match(line) || line.strip_prefix("# ").is_some_and(needs_escape)
}

fn escape(line: &str) -> String {
    if needs_escape(line) {
        format!("# {}", line)
    } else {
        line.to_string()
    }
}

fn unescape(line: &str) -> &str {
    match line.strip_prefix("# ") {
        Some(rest) if needs_escape(rest) => rest,
        _ => line,
    }
}

fn uncomment(line: &str) -> &str {
    if let Some(rest) = line.strip_prefix("# ") {
        rest
    } else if let Some(rest) = line.strip_prefix('#') {
        rest
    } else {
        line
    }
}
