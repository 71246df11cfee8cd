// monojust/src/index.rs

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::{
    config::Config,
    error::{IndexError, Result},
    extract::Extractor,
    parser::Target,
    scanner::{Locations, Scanner},
};

/// A target together with the directory whose definition file declared it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexedTarget {
    pub target: Target,
    pub location: PathBuf,
}

#[derive(Default)]
pub struct Indexer {
    scanner: Scanner,
    extractor: Extractor,
}

impl Indexer {
    pub fn new(scanner: Scanner, extractor: Extractor) -> Self { Self { scanner, extractor } }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        Ok(Self::new(Scanner::from_config(&cfg.scan)?, Extractor::from_config(&cfg.extract)))
    }

    pub fn scanner(&self) -> &Scanner { &self.scanner }
    pub fn extractor(&self) -> &Extractor { &self.extractor }

    pub fn locations(&self, root: &Path) -> Locations { self.scanner.scan(root) }

    /// The definition file directly inside `dir`.
    pub fn find_definition(&self, dir: &Path) -> Result<PathBuf> {
        self.scanner.policy().definition_in(dir).ok_or_else(|| IndexError::NotFound(dir.to_path_buf()))
    }

    /// Working directory first, then the repository root.
    pub fn find_best_definition(&self, cwd: &Path, repo_root: &Path) -> Result<PathBuf> {
        self.find_definition(cwd).or_else(|_| self.find_definition(repo_root))
    }

    /// Every target of every location under `root`, without deduplication.
    /// Locations whose file cannot be read are skipped.
    pub fn index_all(&self, root: &Path) -> Vec<IndexedTarget> {
        let mut out = vec![];
        for location in self.locations(root) {
            let Some(file) = self.scanner.policy().definition_in(&location) else { continue };
            match self.extractor.extract(&file) {
                Ok(targets) => {
                    debug!(location = %location.display(), count = targets.len(), "indexed");
                    out.extend(targets.into_iter().map(|target| IndexedTarget { target, location: location.clone() }));
                }
                Err(e) => warn!(location = %location.display(), "skipping location: {e}"),
            }
        }
        out
    }

    /// Targets of the single location `dir`; errors surface directly.
    pub fn index_one(&self, dir: &Path) -> Result<Vec<Target>> {
        let file = self.find_definition(dir)?;
        self.extractor.extract(&file)
    }

    /// Locations under `root` whose definition file declares `name`.
    pub fn locations_declaring(&self, root: &Path, name: &str) -> Vec<PathBuf> {
        self.locations(root)
            .filter(|loc| match self.index_one(loc) {
                Ok(targets) => targets.iter().any(|t| t.name == name),
                Err(e) => { debug!(location = %loc.display(), "skipping location: {e}"); false }
            })
            .collect()
    }
}
