// monojust/src/runner.rs

use std::{
    io::Write,
    path::Path,
    process::{Command, ExitStatus},
};
use tracing::info;

use crate::{
    config::ExtractConfig,
    error::{IndexError, Result},
    extract::Extractor,
};

/// Fails with the declared names when `file` has no target `name`.
pub fn validate_target(extractor: &Extractor, file: &Path, name: &str) -> Result<()> {
    let targets = extractor.extract(file)?;
    if targets.iter().any(|t| t.name == name) { return Ok(()); }
    Err(IndexError::TargetNotFound {
        name: name.to_string(),
        available: targets.into_iter().map(|t| t.name).collect(),
    })
}

/// Invokes the external runner for one target, in the definition file's directory.
#[derive(Clone, Debug)]
pub struct Runner {
    program: String,
}

impl Runner {
    pub fn new(program: impl Into<String>) -> Self { Self { program: program.into() } }

    pub fn from_config(cfg: &ExtractConfig) -> Self { Self::new(cfg.runner()) }

    pub fn program(&self) -> &str { &self.program }

    pub fn command(&self, file: &Path, target: &str, args: &[String]) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg(target).args(args);
        if let Some(dir) = file.parent() { cmd.current_dir(dir); }
        cmd
    }

    /// `Running: cd DIR && just target args...`
    pub fn describe(&self, file: &Path, target: &str, args: &[String]) -> String {
        let dir = file.parent().unwrap_or_else(|| Path::new("."));
        let mut line = format!("Running: cd {} && {} {target}", dir.display(), self.program);
        for a in args {
            line.push(' ');
            line.push_str(a);
        }
        line
    }

    /// Runs with inherited stdio and returns the child's exit status.
    pub fn run(&self, file: &Path, target: &str, args: &[String], echo: Option<&mut dyn Write>) -> Result<ExitStatus> {
        if let Some(out) = echo {
            writeln!(out, "{}", self.describe(file, target, args))?;
        }
        info!(program = %self.program, target, file = %file.display(), "running target");
        self.command(file, target, args)
            .status()
            .map_err(|source| IndexError::Runner { program: self.program.clone(), source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn validation_lists_available_targets() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("justfile");
        fs::write(&file, "build:\ntest:\n_private:\n").unwrap();
        let ex = Extractor::default();
        validate_target(&ex, &file, "build").unwrap();
        let err = validate_target(&ex, &file, "deploy").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "target 'deploy' not found. Available targets: build, test");
        // private names cannot be run through the index
        assert!(validate_target(&ex, &file, "_private").is_err());
    }

    #[test]
    fn command_runs_in_definition_directory() {
        let r = Runner::new("just");
        let args = vec!["--flag".to_string(), "x".to_string()];
        let cmd = r.command(Path::new("/repo/api/justfile"), "test", &args);
        assert_eq!(cmd.get_program(), "just");
        let got: Vec<&std::ffi::OsStr> = cmd.get_args().collect();
        assert_eq!(got, vec!["test", "--flag", "x"]);
        assert_eq!(cmd.get_current_dir(), Some(Path::new("/repo/api")));
    }

    #[test]
    fn describe_matches_echo_format() {
        let r = Runner::new("just");
        assert_eq!(r.describe(Path::new("/repo/justfile"), "build", &[]), "Running: cd /repo && just build");
        assert_eq!(
            r.describe(Path::new("/repo/justfile"), "test", &["a".into(), "b".into()]),
            "Running: cd /repo && just test a b"
        );
    }

    #[test]
    fn missing_runner_is_reported() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("justfile");
        fs::write(&file, "build:\n").unwrap();
        let mut echoed = Vec::new();
        let err = Runner::new("monojust-no-such-runner").run(&file, "build", &[], Some(&mut echoed)).unwrap_err();
        assert!(matches!(err, IndexError::Runner { .. }));
        assert!(String::from_utf8(echoed).unwrap().starts_with("Running: cd "));
    }
}
