// monojust/src/render.rs

use serde::{Deserialize, Serialize};
use std::{io::Write, path::PathBuf};
use unicode_width::UnicodeWidthStr;

use crate::{config::OutputFormat, index::IndexedTarget, parser::Target};

/// One row of `j list`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TargetInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub directory: PathBuf,
    pub justfile_path: PathBuf,
}

impl From<&Target> for TargetInfo {
    fn from(t: &Target) -> Self {
        Self {
            name: t.name.clone(),
            description: t.description.clone(),
            directory: t.location().to_path_buf(),
            justfile_path: t.source.clone(),
        }
    }
}

impl From<&IndexedTarget> for TargetInfo {
    fn from(e: &IndexedTarget) -> Self {
        Self { directory: e.location.clone(), ..Self::from(&e.target) }
    }
}

const HEADER: [&str; 3] = ["TARGET", "DESCRIPTION", "DIRECTORY"];
const PADDING: usize = 2;

/// Aligned columns separated by at least two spaces, widths measured in terminal cells.
pub fn table(rows: &[TargetInfo]) -> String {
    let cells: Vec<[String; 3]> = std::iter::once(HEADER.map(String::from))
        .chain(rows.iter().map(|r| [r.name.clone(), r.description.clone(), r.directory.display().to_string()]))
        .collect();
    let mut widths = [0usize; 3];
    for row in &cells {
        for (w, cell) in widths.iter_mut().zip(row) { *w = (*w).max(cell.width()); }
    }
    let mut out = String::new();
    for row in &cells {
        let mut line = String::new();
        for (i, cell) in row.iter().enumerate() {
            line.push_str(cell);
            if i + 1 < row.len() {
                line.push_str(&" ".repeat(widths[i] - cell.width() + PADDING));
            }
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

pub fn json(rows: &[TargetInfo]) -> serde_json::Result<String> {
    let mut s = serde_json::to_string_pretty(rows)?;
    s.push('\n');
    Ok(s)
}

pub fn write_targets(out: &mut impl Write, rows: &[TargetInfo], format: OutputFormat) -> std::io::Result<()> {
    let text = match format {
        OutputFormat::Table => table(rows),
        OutputFormat::Json => json(rows).map_err(std::io::Error::other)?,
    };
    out.write_all(text.as_bytes())
}
