// monojust/src/parser.rs

//! Line-oriented recognition of target definitions in a justfile.
//!
//! A definition line, once trimmed, is non-empty and is not a `#` comment; the
//! code in front of any trailing `#` ends with `:` and contains no `=`. The first
//! whitespace token before the colon is the target name and the text after the
//! first `#` on the same line is the description. Comment lines above a recipe
//! are not associated with it. Names starting with `_` are private and never
//! returned.

use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use crate::error::{IndexError, Result};

/// A named task declared by one definition file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Absolute path of the definition file that declared it.
    pub source: PathBuf,
}

impl Target {
    pub fn is_private(name: &str) -> bool { name.starts_with('_') }

    /// Directory owning the declaring file.
    pub fn location(&self) -> &Path {
        self.source.parent().unwrap_or_else(|| Path::new(""))
    }
}

/// Targets gathered from one file, plus the read error that cut the scan short, if any.
#[derive(Debug)]
pub struct ParseOutcome {
    pub targets: Vec<Target>,
    pub error: Option<IndexError>,
}

impl ParseOutcome {
    /// Strict view: any read error wins over the partial result.
    pub fn into_result(self) -> Result<Vec<Target>> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.targets),
        }
    }
}

/// Splits a trimmed line into its code part and the trailing `#` comment, if any.
fn split_comment(line: &str) -> (&str, Option<&str>) {
    match line.split_once('#') {
        Some((code, comment)) => (code.trim(), Some(comment.trim())),
        None => (line, None),
    }
}

pub fn is_definition_line(line: &str) -> bool {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') { return false; }
    let (code, _) = split_comment(line);
    code.ends_with(':') && !code.contains('=')
}

/// Parses one line into `(name, description)`; `None` for non-definitions and private targets.
pub fn parse_line(line: &str) -> Option<(String, String)> {
    if !is_definition_line(line) { return None; }
    let (code, comment) = split_comment(line.trim());
    let name = code.strip_suffix(':')?.trim().split_whitespace().next()?;
    if Target::is_private(name) { return None; }
    Some((name.to_string(), comment.unwrap_or_default().to_string()))
}

/// Parses an already-open reader. `source` is recorded on every target.
/// Bytes that are not UTF-8 are replaced, not rejected.
pub fn parse_reader<R: BufRead>(reader: R, source: &Path) -> ParseOutcome {
    let mut targets = Vec::new();
    for raw in reader.split(b'\n') {
        let bytes = match raw {
            Ok(b) => b,
            Err(e) => {
                return ParseOutcome { targets, error: Some(IndexError::parse_failure(source, e)) };
            }
        };
        let bytes = bytes.strip_suffix(b"\r").unwrap_or(&bytes[..]);
        let line = String::from_utf8_lossy(bytes);
        if let Some((name, description)) = parse_line(&line) {
            targets.push(Target { name, description, source: source.to_path_buf() });
        }
    }
    ParseOutcome { targets, error: None }
}

/// Opens and parses a definition file. Fails with `NotFound` if it cannot be opened.
pub fn parse_file(path: &Path) -> Result<ParseOutcome> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => IndexError::NotFound(path.to_path_buf()),
        _ => IndexError::parse_failure(path, e),
    })?;
    Ok(parse_reader(BufReader::new(file), path))
}
