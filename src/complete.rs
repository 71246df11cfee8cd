// monojust/src/complete.rs

//! Shell-completion entry points. Each one gathers candidate strings from the
//! index and hands them to the fuzzy matcher.

use std::path::Path;
use tracing::debug;

use crate::{
    config::Config,
    disambiguate::{self, CandidateSet},
    error::Result,
    fuzzy,
    index::Indexer,
    location::{self, PathResolver},
};

pub struct Completer {
    indexer: Indexer,
    resolver: PathResolver,
}

impl Completer {
    pub fn new(indexer: Indexer, resolver: PathResolver) -> Self { Self { indexer, resolver } }

    pub fn from_config(cfg: &Config, repo_root: &Path) -> Result<Self> {
        let resolver = PathResolver::new(repo_root).confine_to_root(cfg.locations.confine_to_root());
        Ok(Self::new(Indexer::from_config(cfg)?, resolver))
    }

    pub fn repo_root(&self) -> &Path { self.resolver.repo_root() }
    pub fn indexer(&self) -> &Indexer { &self.indexer }
    pub fn resolver(&self) -> &PathResolver { &self.resolver }

    /// Every target in the repository, disambiguated.
    pub fn candidates(&self) -> CandidateSet {
        disambiguate::disambiguate(&self.indexer.index_all(self.repo_root()), self.repo_root())
    }

    /// Completes the word after `args`.
    ///
    /// With a lone target name already typed, the word is a location declaring
    /// it. With an `@location` among `args`, only that location's names are
    /// offered, bare. Otherwise the whole repository is offered.
    pub fn targets(&self, args: &[String], query: &str) -> Result<Vec<String>> {
        if let [target] = args
            && !location::is_token(target)
        {
            return Ok(self.locations_with_target(target, query));
        }

        let displays = match args.iter().find(|a| location::is_token(a)) {
            Some(token) => {
                let dir = self.resolver.resolve(token)?;
                let mut names: Vec<String> = vec![];
                for t in self.indexer.index_one(&dir)? {
                    if !names.contains(&t.name) { names.push(t.name); }
                }
                names
            }
            None => self.candidates().displays(),
        };
        debug!(count = displays.len(), query, "target candidates");
        Ok(fuzzy::fuzzy_match(query, &displays))
    }

    /// Every location holding a definition file, root excluded.
    pub fn locations(&self, query: &str) -> Vec<String> {
        let root = self.repo_root();
        let tokens: Vec<String> = self.indexer.locations(root).filter_map(|l| location::qualify(&l, root)).collect();
        fuzzy::fuzzy_match(query, &tokens)
    }

    /// Locations whose definition file declares `target`, root excluded.
    pub fn locations_with_target(&self, target: &str, query: &str) -> Vec<String> {
        let root = self.repo_root();
        let tokens: Vec<String> = self.indexer
            .locations_declaring(root, target)
            .iter()
            .filter_map(|l| location::qualify(l, root))
            .collect();
        fuzzy::fuzzy_match(query, &tokens)
    }
}
