// monojust/src/repo.rs

use git2::Repository;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Work-tree root of the git repository containing `cwd`, or `cwd` itself outside a repository.
pub fn find_repo_root(cwd: &Path) -> PathBuf {
    match Repository::discover(cwd) {
        Ok(repo) => match repo.workdir() {
            Some(dir) => normalize(dir),
            None => cwd.to_path_buf(), // bare repository
        },
        Err(e) => {
            debug!(cwd = %cwd.display(), "not inside a git repository: {}", e.message());
            cwd.to_path_buf()
        }
    }
}

pub fn is_git_repo(cwd: &Path) -> bool { Repository::discover(cwd).is_ok() }

// git2 reports work dirs with a trailing separator
fn normalize(dir: &Path) -> PathBuf { dir.components().collect() }
