// monojust/src/scanner.rs

use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::debug;
use walkdir::WalkDir;

use crate::{
    config::ScanConfig,
    error::{IndexError, Result},
};

/// Build a GlobSet from patterns.
fn build_globset(patterns: &[String]) -> Result<Option<GlobSet>> {
    if patterns.is_empty() { return Ok(None); }
    let mut b = GlobSetBuilder::new();
    for p in patterns {
        let glob = Glob::new(p).map_err(|e| IndexError::Config { path: PathBuf::from("[scan].exclude_globs"), message: e.to_string() })?;
        b.add(glob);
    }
    let set = b.build().map_err(|e| IndexError::Config { path: PathBuf::from("[scan].exclude_globs"), message: e.to_string() })?;
    Ok(Some(set))
}

/// Which directories are pruned and which file names mark a location.
#[derive(Clone, Debug)]
pub struct ScanPolicy {
    pub definition_files: Vec<String>,
    exclude_dirs: BTreeSet<String>,
    exclude_globs: Option<GlobSet>,
    pub follow_links: bool,
    pub respect_gitignore: bool,
}

impl ScanPolicy {
    pub fn from_config(cfg: &ScanConfig) -> Result<Self> {
        Ok(Self {
            definition_files: cfg.definition_files(),
            exclude_dirs: cfg.exclude_dirs().into_iter().collect(),
            exclude_globs: build_globset(&cfg.exclude_globs)?,
            follow_links: cfg.follow_links(),
            respect_gitignore: cfg.respect_gitignore(),
        })
    }

    /// Hidden and excluded directories are skipped together with their descendants.
    /// The root itself is never pruned.
    pub fn prunes(&self, root: &Path, dir: &Path) -> bool {
        let name = dir.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        if name.starts_with('.') || self.exclude_dirs.contains(&*name) { return true; }
        match (&self.exclude_globs, dir.strip_prefix(root)) {
            (Some(gs), Ok(rel)) => gs.is_match(rel),
            _ => false,
        }
    }

    /// The definition file directly inside `dir`, first configured name wins.
    pub fn definition_in(&self, dir: &Path) -> Option<PathBuf> {
        self.definition_files.iter().map(|f| dir.join(f)).find(|p| p.is_file())
    }
}

impl Default for ScanPolicy {
    fn default() -> Self {
        let cfg = ScanConfig::default();
        Self {
            definition_files: cfg.definition_files(),
            exclude_dirs: cfg.exclude_dirs().into_iter().collect(),
            exclude_globs: None,
            follow_links: false,
            respect_gitignore: false,
        }
    }
}

/// Lazy, single-pass sequence of directories that hold a definition file.
pub struct Locations {
    inner: Box<dyn Iterator<Item = PathBuf>>,
}

impl Iterator for Locations {
    type Item = PathBuf;
    fn next(&mut self) -> Option<PathBuf> { self.inner.next() }
}

#[derive(Clone, Debug, Default)]
pub struct Scanner {
    policy: Arc<ScanPolicy>,
}

impl Scanner {
    pub fn new(policy: ScanPolicy) -> Self { Self { policy: Arc::new(policy) } }

    pub fn from_config(cfg: &ScanConfig) -> Result<Self> { Ok(Self::new(ScanPolicy::from_config(cfg)?)) }

    pub fn policy(&self) -> &ScanPolicy { &self.policy }

    /// Depth-first, pre-order walk in file-name order. Unreadable entries are skipped.
    pub fn scan(&self, root: &Path) -> Locations {
        let inner: Box<dyn Iterator<Item = PathBuf>> = if self.policy.respect_gitignore {
            Box::new(self.walk_ignore(root))
        } else {
            Box::new(self.walk_dirs(root))
        };
        Locations { inner }
    }

    fn walk_dirs(&self, root: &Path) -> impl Iterator<Item = PathBuf> + 'static {
        let prune = self.policy.clone();
        let found = self.policy.clone();
        let root_buf = root.to_path_buf();
        WalkDir::new(root)
            .follow_links(self.policy.follow_links)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |e| e.depth() == 0 || !(e.file_type().is_dir() && prune.prunes(&root_buf, e.path())))
            .filter_map(|r| match r {
                Ok(de) => Some(de),
                Err(err) => { debug!("skipping unreadable entry: {err}"); None }
            })
            .filter(|de| de.file_type().is_dir())
            .filter(move |de| found.definition_in(de.path()).is_some())
            .map(|de| {
                debug!(location = %de.path().display(), "found definition file");
                de.into_path()
            })
    }

    fn walk_ignore(&self, root: &Path) -> impl Iterator<Item = PathBuf> + 'static {
        let prune = self.policy.clone();
        let found = self.policy.clone();
        let root_buf = root.to_path_buf();
        let mut b = WalkBuilder::new(root);
        b.hidden(false)
            .parents(false)
            .git_ignore(true)
            .git_exclude(true)
            .git_global(false)
            .require_git(false)
            .follow_links(self.policy.follow_links)
            .sort_by_file_name(|x, y| x.cmp(y))
            .filter_entry(move |e| {
                let is_dir = e.file_type().is_some_and(|t| t.is_dir());
                e.depth() == 0 || !(is_dir && prune.prunes(&root_buf, e.path()))
            });
        b.build()
            .filter_map(|r| match r {
                Ok(de) => Some(de),
                Err(err) => { debug!("skipping unreadable entry: {err}"); None }
            })
            .filter(|de| de.file_type().is_some_and(|t| t.is_dir()))
            .filter(move |de| found.definition_in(de.path()).is_some())
            .map(|de| {
                debug!(location = %de.path().display(), "found definition file");
                de.into_path()
            })
    }
}
