// monojust/src/extract.rs

use regex::Regex;
use std::{path::Path, process::Command, sync::LazyLock};
use tracing::debug;

use crate::{
    config::{ExtractConfig, StrategyKind},
    error::{IndexError, Result},
    parser::{self, Target},
};

/// One way of turning a definition file into its targets.
pub trait ExtractStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn extract(&self, file: &Path) -> Result<Vec<Target>>;
}

/// Reads the file directly, line by line.
pub struct DefinitionScan;

impl ExtractStrategy for DefinitionScan {
    fn name(&self) -> &'static str { "definition_scan" }
    fn extract(&self, file: &Path) -> Result<Vec<Target>> {
        parser::parse_file(file)?.into_result()
    }
}

/// Asks the runner for its own listing (`<runner> --list --unsorted`) in the file's directory.
pub struct RunnerListing {
    pub program: String,
}

// `    name param='x' *rest # description`
static LISTING_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>[^\s#\[]+)(?:[^#]*)(?:#\s*(?P<desc>.*))?$").expect("static regex")
});

impl RunnerListing {
    pub fn new(program: impl Into<String>) -> Self { Self { program: program.into() } }

    /// Parses listing output; the first line is a header.
    pub fn parse_listing(output: &str, source: &Path) -> Vec<Target> {
        let mut targets = vec![];
        for line in output.lines().skip(1) {
            let line = line.trim();
            if line.is_empty() { continue; }
            let Some(caps) = LISTING_LINE.captures(line) else { continue };
            let name = &caps["name"];
            if Target::is_private(name) { continue; }
            let description = caps.name("desc").map(|m| m.as_str().trim().to_string()).unwrap_or_default();
            targets.push(Target { name: name.to_string(), description, source: source.to_path_buf() });
        }
        targets
    }
}

impl ExtractStrategy for RunnerListing {
    fn name(&self) -> &'static str { "runner_listing" }
    fn extract(&self, file: &Path) -> Result<Vec<Target>> {
        if !file.is_file() { return Err(IndexError::NotFound(file.to_path_buf())); }
        let dir = file.parent().unwrap_or_else(|| Path::new("."));
        let output = Command::new(&self.program)
            .args(["--list", "--unsorted", "--justfile"])
            .arg(file)
            .current_dir(dir)
            .output()
            .map_err(|source| IndexError::Runner { program: self.program.clone(), source })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(IndexError::Runner {
                program: self.program.clone(),
                source: std::io::Error::other(format!("{} --list exited with {}: {}", self.program, output.status, stderr.trim())),
            });
        }
        Ok(Self::parse_listing(&String::from_utf8_lossy(&output.stdout), file))
    }
}

/// Tries its strategies in order; the first success wins, otherwise the last error is returned.
pub struct Extractor {
    strategies: Vec<Box<dyn ExtractStrategy>>,
}

impl Default for Extractor {
    fn default() -> Self { Self::new(vec![Box::new(DefinitionScan)]) }
}

impl Extractor {
    pub fn new(strategies: Vec<Box<dyn ExtractStrategy>>) -> Self { Self { strategies } }

    pub fn from_config(cfg: &ExtractConfig) -> Self {
        let strategies = cfg.strategies().into_iter().map(|kind| -> Box<dyn ExtractStrategy> {
            match kind {
                StrategyKind::DefinitionScan => Box::new(DefinitionScan),
                StrategyKind::RunnerListing => Box::new(RunnerListing::new(cfg.runner())),
            }
        }).collect();
        Self::new(strategies)
    }

    pub fn strategy_names(&self) -> Vec<&'static str> { self.strategies.iter().map(|s| s.name()).collect() }

    pub fn extract(&self, file: &Path) -> Result<Vec<Target>> {
        let mut last_err = None;
        for s in &self.strategies {
            match s.extract(file) {
                Ok(targets) => return Ok(targets),
                Err(e) => {
                    debug!(strategy = s.name(), file = %file.display(), "extraction failed: {e}");
                    last_err = Some(e);
                }
            }
        }
        Err(last_err.unwrap_or_else(|| IndexError::NotFound(file.to_path_buf())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    struct Failing;
    impl ExtractStrategy for Failing {
        fn name(&self) -> &'static str { "failing" }
        fn extract(&self, file: &Path) -> Result<Vec<Target>> {
            Err(IndexError::parse_failure(file, std::io::Error::other("nope")))
        }
    }

    #[test]
    fn listing_output_is_parsed() {
        let out = "Available recipes:\n    build\n    test filter='' # Run the tests\n    deploy env *args # Deploy\n    _hidden\n\n";
        let targets = RunnerListing::parse_listing(out, Path::new("/r/justfile"));
        let got: Vec<(&str, &str)> = targets.iter().map(|t| (t.name.as_str(), t.description.as_str())).collect();
        assert_eq!(got, vec![("build", ""), ("test", "Run the tests"), ("deploy", "Deploy")]);
    }

    #[test]
    fn falls_back_to_next_strategy() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("justfile");
        fs::write(&file, "build:\n").unwrap();
        let ex = Extractor::new(vec![Box::new(Failing), Box::new(DefinitionScan)]);
        let targets = ex.extract(&file).unwrap();
        assert_eq!(targets[0].name, "build");
    }

    #[test]
    fn missing_runner_falls_back_to_scan() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("justfile");
        fs::write(&file, "lint: # Lint it\n").unwrap();
        let ex = Extractor::new(vec![
            Box::new(RunnerListing::new("monojust-no-such-runner")),
            Box::new(DefinitionScan),
        ]);
        let targets = ex.extract(&file).unwrap();
        assert_eq!(targets[0].description, "Lint it");
    }

    #[test]
    fn last_error_is_reported() {
        let ex = Extractor::new(vec![Box::new(Failing)]);
        let err = ex.extract(Path::new("/x/justfile")).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::ParseFailure);
    }

    #[test]
    fn config_order_is_kept() {
        let cfg = ExtractConfig { strategies: vec![StrategyKind::RunnerListing, StrategyKind::DefinitionScan], runner: None };
        assert_eq!(Extractor::from_config(&cfg).strategy_names(), vec!["runner_listing", "definition_scan"]);
    }
}
