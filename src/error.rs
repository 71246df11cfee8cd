// monojust/src/error.rs

use std::{io, path::PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IndexError>;

/// Coarse classification callers match on instead of the payload-carrying variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind { NotFound, ParseFailure, InvalidToken, Other }

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read definition file {}: {source}", .path.display())]
    ParseFailure { path: PathBuf, #[source] source: io::Error },

    #[error("location must start with '@', got: {0}")]
    InvalidToken(String),

    #[error("location {token} escapes the repository root")]
    EscapesRoot { token: String },

    #[error("target '{name}' not found. Available targets: {}", .available.join(", "))]
    TargetNotFound { name: String, available: Vec<String> },

    #[error("failed to run {program}: {source}")]
    Runner { program: String, #[source] source: io::Error },

    #[error("invalid config {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl IndexError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) | Self::TargetNotFound { .. } => ErrorKind::NotFound,
            Self::ParseFailure { .. } => ErrorKind::ParseFailure,
            Self::InvalidToken(_) | Self::EscapesRoot { .. } => ErrorKind::InvalidToken,
            Self::Runner { .. } | Self::Config { .. } | Self::Io(_) => ErrorKind::Other,
        }
    }

    pub(crate) fn parse_failure(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::ParseFailure { path: path.into(), source }
    }
}
