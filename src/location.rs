// monojust/src/location.rs

//! `@path` location tokens: a fixed sigil followed by a slash-separated path
//! relative to the repository root. Used both to resolve user input and to
//! qualify same-named targets in completion candidates.

use std::path::{Component, Path, PathBuf};

use crate::error::{IndexError, Result};

pub const SIGIL: char = '@';

pub fn is_token(arg: &str) -> bool { arg.starts_with(SIGIL) }

/// Renders `location` as a token relative to `repo_root`.
///
/// Returns `None` for the root itself and for directories outside the root.
pub fn qualify(location: &Path, repo_root: &Path) -> Option<String> {
    let rel = location.strip_prefix(repo_root).ok()?;
    if rel.as_os_str().is_empty() { return None; }
    let parts: Vec<String> = rel.components().map(|c| c.as_os_str().to_string_lossy().into_owned()).collect();
    Some(format!("{SIGIL}{}", parts.join("/")))
}

/// True when joining `rel` onto a root can only land inside it.
fn stays_inside(rel: &Path) -> bool {
    let mut depth = 0usize;
    for c in rel.components() {
        match c {
            Component::Normal(_) => depth += 1,
            Component::CurDir => {}
            Component::ParentDir => {
                if depth == 0 { return false; }
                depth -= 1;
            }
            Component::RootDir | Component::Prefix(_) => return false,
        }
    }
    true
}

/// Maps `@some/dir` to `repo_root/some/dir`; the directory must exist.
#[derive(Clone, Debug)]
pub struct PathResolver {
    repo_root: PathBuf,
    confine_to_root: bool,
}

impl PathResolver {
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        Self { repo_root: repo_root.into(), confine_to_root: true }
    }

    /// Allow tokens whose `..` segments or absolute paths leave the root.
    pub fn confine_to_root(mut self, on: bool) -> Self { self.confine_to_root = on; self }

    pub fn repo_root(&self) -> &Path { &self.repo_root }

    pub fn resolve(&self, token: &str) -> Result<PathBuf> {
        let rel = token.strip_prefix(SIGIL).ok_or_else(|| IndexError::InvalidToken(token.to_string()))?;
        let rel = Path::new(rel);
        if self.confine_to_root && !stays_inside(rel) {
            return Err(IndexError::EscapesRoot { token: token.to_string() });
        }
        let full = self.repo_root.join(rel);
        if !full.exists() { return Err(IndexError::NotFound(full)); }
        Ok(full)
    }
}

/// Resolves `token` against `repo_root` with containment checks on.
pub fn resolve(token: &str, repo_root: &Path) -> Result<PathBuf> {
    PathResolver::new(repo_root).resolve(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn resolves_existing_directory() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("backend")).unwrap();
        assert_eq!(resolve("@backend", dir.path()).unwrap(), dir.path().join("backend"));
    }

    #[test]
    fn missing_directory_is_not_found() {
        let dir = TempDir::new().unwrap();
        assert_eq!(resolve("@backend", dir.path()).unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn token_without_sigil_is_rejected() {
        let dir = TempDir::new().unwrap();
        assert_eq!(resolve("backend", dir.path()).unwrap_err().kind(), ErrorKind::InvalidToken);
    }

    #[test]
    fn escaping_tokens_are_rejected_unless_allowed() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("repo/app")).unwrap();
        let root = dir.path().join("repo");
        assert!(matches!(resolve("@../repo", &root), Err(IndexError::EscapesRoot { .. })));
        assert!(matches!(resolve("@/etc", &root), Err(IndexError::EscapesRoot { .. })));
        assert_eq!(resolve("@app/../app", &root).unwrap(), root.join("app/../app"));

        let loose = PathResolver::new(&root).confine_to_root(false);
        assert_eq!(loose.resolve("@../repo").unwrap(), root.join("../repo"));
    }

    #[test]
    fn qualify_is_root_relative() {
        let root = Path::new("/repo");
        assert_eq!(qualify(Path::new("/repo/services/api"), root).as_deref(), Some("@services/api"));
        assert_eq!(qualify(root, root), None);
        assert_eq!(qualify(Path::new("/elsewhere"), root), None);
    }
}
