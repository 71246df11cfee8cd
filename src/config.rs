// monojust/src/config.rs

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::{Path, PathBuf}};
use tracing::{debug, warn};

use crate::error::{IndexError, Result};

/// Build/output/dependency/cache directory names pruned like hidden directories.
pub const DEFAULT_EXCLUDE_DIRS: &[&str] = &[
    "node_modules", "target", "dist", "build", "tmp", "vendor",
    "venv", "__pycache__", "coverage", "logs",
];

pub const DEFAULT_DEFINITION_FILE: &str = "justfile";
pub const DEFAULT_RUNNER: &str = "just";

/// Config is merged: system -> user -> workspace -> invocation overlay
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub scan: ScanConfig,
    pub extract: ExtractConfig,
    pub locations: LocationsConfig,
    pub list: ListConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ScanConfig {
    pub definition_files: Vec<String>,    // first existing name in a directory wins
    pub exclude_dirs: Vec<String>,        // replaces DEFAULT_EXCLUDE_DIRS when non-empty
    pub extra_exclude_dirs: Vec<String>,
    pub exclude_globs: Vec<String>,       // matched against root-relative paths
    pub respect_gitignore: Option<bool>,
    pub follow_links: Option<bool>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind { DefinitionScan, RunnerListing }

#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ExtractConfig {
    pub strategies: Vec<StrategyKind>,
    pub runner: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct LocationsConfig {
    pub confine_to_root: Option<bool>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat { #[default] Table, Json }

#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ListConfig {
    pub format: Option<OutputFormat>,
}

impl ScanConfig {
    pub fn definition_files(&self) -> Vec<String> {
        if self.definition_files.is_empty() {
            vec![DEFAULT_DEFINITION_FILE.into()]
        } else { self.definition_files.clone() }
    }

    pub fn exclude_dirs(&self) -> Vec<String> {
        let mut out: Vec<String> = if self.exclude_dirs.is_empty() {
            DEFAULT_EXCLUDE_DIRS.iter().map(|s| s.to_string()).collect()
        } else { self.exclude_dirs.clone() };
        out.extend(self.extra_exclude_dirs.iter().cloned());
        out
    }

    pub fn respect_gitignore(&self) -> bool { self.respect_gitignore.unwrap_or(false) }
    pub fn follow_links(&self) -> bool { self.follow_links.unwrap_or(false) }
}

impl ExtractConfig {
    pub fn strategies(&self) -> Vec<StrategyKind> {
        if self.strategies.is_empty() { vec![StrategyKind::DefinitionScan] } else { self.strategies.clone() }
    }
    pub fn runner(&self) -> &str { self.runner.as_deref().unwrap_or(DEFAULT_RUNNER) }
}

impl LocationsConfig {
    pub fn confine_to_root(&self) -> bool { self.confine_to_root.unwrap_or(true) }
}

impl ListConfig {
    pub fn format(&self) -> OutputFormat { self.format.unwrap_or_default() }
}

impl Config {
    pub fn from_toml_str(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

fn merge(a: &mut Config, b: &Config) {
    if !b.scan.definition_files.is_empty() { a.scan.definition_files = b.scan.definition_files.clone(); }
    if !b.scan.exclude_dirs.is_empty() { a.scan.exclude_dirs = b.scan.exclude_dirs.clone(); }
    a.scan.extra_exclude_dirs.extend(b.scan.extra_exclude_dirs.iter().cloned());
    a.scan.exclude_globs.extend(b.scan.exclude_globs.iter().cloned());
    if b.scan.respect_gitignore.is_some() { a.scan.respect_gitignore = b.scan.respect_gitignore; }
    if b.scan.follow_links.is_some() { a.scan.follow_links = b.scan.follow_links; }

    if !b.extract.strategies.is_empty() { a.extract.strategies = b.extract.strategies.clone(); }
    if b.extract.runner.is_some() { a.extract.runner = b.extract.runner.clone(); }

    if b.locations.confine_to_root.is_some() { a.locations.confine_to_root = b.locations.confine_to_root; }

    if b.list.format.is_some() { a.list.format = b.list.format; }
}

fn config_paths(repo_root: &Path) -> (PathBuf, Option<PathBuf>, PathBuf) {
    let user = ProjectDirs::from("dev", "monojust", "monojust").map(|p| p.config_dir().join("config.toml"));
    let system = if cfg!(target_os = "windows") {
        PathBuf::from(r"C:\ProgramData\monojust\config.toml")
    } else {
        PathBuf::from("/etc/monojust/config.toml")
    };
    let workspace = repo_root.join(".monojust").join("config.toml");
    (system, user, workspace)
}

/// Loads and merges the config layers once per invocation; nothing is watched or cached.
#[derive(Clone, Debug)]
pub struct ConfigManager {
    merged: Config,
    layers: Vec<PathBuf>,
}

impl ConfigManager {
    pub fn load(repo_root: impl AsRef<Path>) -> Self {
        let (system, user, workspace) = config_paths(repo_root.as_ref());
        let mut layers = vec![system];
        layers.extend(user);
        layers.push(workspace);
        Self::from_layers(layers)
    }

    pub fn from_layers(layers: Vec<PathBuf>) -> Self {
        let mut merged = Config::default();
        for path in &layers {
            match Self::read_file(path) {
                Ok(Some(layer)) => merge(&mut merged, &layer),
                Ok(None) => {}
                Err(e) => warn!("skipping config layer: {e}"),
            }
        }
        Self { merged, layers }
    }

    fn read_file(path: &Path) -> Result<Option<Config>> {
        let text = match fs::read_to_string(path) {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(IndexError::Config { path: path.to_path_buf(), message: e.to_string() }),
        };
        debug!(path = %path.display(), "loaded config layer");
        Config::from_toml_str(&text)
            .map(Some)
            .map_err(|e| IndexError::Config { path: path.to_path_buf(), message: e.to_string() })
    }

    pub fn get(&self) -> Config { self.merged.clone() }
    pub fn layers(&self) -> &[PathBuf] { &self.layers }

    /// Overlays per-invocation settings (command-line flags) on top of the file layers.
    pub fn apply_overlay(&mut self, patch: &Config) { merge(&mut self.merged, patch); }
}

/// Per-call options. Built once by the command layer and passed by value.
#[derive(Clone, Debug)]
pub struct Invocation {
    pub repo_root: PathBuf,
    pub working_dir: PathBuf,
    pub format: OutputFormat,
    pub recursive: bool,
    pub verbose: bool,
    pub quiet: bool,
}

impl Invocation {
    pub fn new(repo_root: impl Into<PathBuf>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            repo_root: repo_root.into(),
            working_dir: working_dir.into(),
            format: OutputFormat::Table,
            recursive: false,
            verbose: false,
            quiet: false,
        }
    }

    /// Whether runner command lines are echoed before execution.
    pub fn echo_commands(&self) -> bool { self.verbose && !self.quiet }
}
