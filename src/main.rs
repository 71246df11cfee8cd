// monojust/src/main.rs

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::{
    io::{self, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};
use tracing::debug;

use monojust::{
    config::{Config, ConfigManager, Invocation, OutputFormat},
    disambiguate::split_display,
    location,
    render::{self, TargetInfo},
    repo,
    runner::{self, Runner},
    Completer,
};

#[derive(Parser, Debug)]
#[command(name = "j", version, about = "Run justfile targets from anywhere in a monorepo")]
struct Cli {
    /// Repository root (default: the git work tree containing the current directory)
    #[arg(long, global = true)]
    root: Option<PathBuf>,
    /// Debug logging and echo runner command lines
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Suppress command echo
    #[arg(short, long, global = true)]
    quiet: bool,
    /// List available targets (same as `j list`)
    #[arg(short = 'l', long = "list")]
    list: bool,
    #[command(subcommand)]
    command: Option<Cmd>,
    #[command(flatten)]
    run: RunArgs,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// List targets of the current directory, a location, or the whole repository
    List(ListArgs),
    /// Run a target: TARGET [@location] [ARGS...]
    Run(RunArgs),
    /// Print completion candidates, one per line
    #[command(subcommand)]
    Complete(CompleteCmd),
}

#[derive(Args, Debug, Default)]
struct RunArgs {
    /// Use the definition file in this directory
    #[arg(short = 'd', long = "directory")]
    directory: Option<PathBuf>,
    /// Target, optional @location, then arguments passed through to the runner
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    words: Vec<String>,
}

#[derive(Args, Debug)]
struct ListArgs {
    /// @location to list
    location: Option<String>,
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,
    /// Every definition file in the repository
    #[arg(short, long)]
    recursive: bool,
}

#[derive(Subcommand, Debug)]
enum CompleteCmd {
    /// Words typed so far; the last one is the word being completed
    Targets {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        words: Vec<String>,
    },
    /// Locations holding a definition file
    Locations { query: Option<String> },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let filter = if cli.verbose { "debug".into() } else { std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()) };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match dispatch(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn dispatch(cli: Cli) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("cannot determine current directory")?;
    let repo_root = match &cli.root {
        Some(r) => std::path::absolute(r).with_context(|| format!("invalid --root {}", r.display()))?,
        None => repo::find_repo_root(&cwd),
    };
    debug!(root = %repo_root.display(), "repository root");

    let mut cm = ConfigManager::load(&repo_root);
    if let Some(Cmd::List(ListArgs { format: Some(f), .. })) = &cli.command {
        let mut patch = Config::default();
        patch.list.format = Some(*f);
        cm.apply_overlay(&patch);
    }
    let config = cm.get();

    let mut inv = Invocation::new(&repo_root, &cwd);
    inv.format = config.list.format();
    inv.verbose = cli.verbose;
    inv.quiet = cli.quiet;

    let completer = Completer::from_config(&config, &repo_root).context("invalid scan configuration")?;

    match cli.command {
        Some(Cmd::List(args)) => {
            inv.recursive = args.recursive;
            list(&inv, &completer, args.location.as_deref())?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Cmd::Run(args)) => run(&inv, &completer, &Runner::from_config(&config.extract), args),
        Some(Cmd::Complete(what)) => {
            complete(&completer, what)?;
            Ok(ExitCode::SUCCESS)
        }
        None if cli.list => {
            list(&inv, &completer, cli.run.words.first().map(String::as_str))?;
            Ok(ExitCode::SUCCESS)
        }
        None if cli.run.words.is_empty() => {
            Cli::command().print_help()?;
            Ok(ExitCode::SUCCESS)
        }
        None => run(&inv, &completer, &Runner::from_config(&config.extract), cli.run),
    }
}

fn resolve_location(completer: &Completer, token: &str) -> Result<PathBuf> {
    completer.resolver().resolve(token).with_context(|| format!("failed to resolve path {token}"))
}

fn list(inv: &Invocation, completer: &Completer, token: Option<&str>) -> Result<()> {
    let indexer = completer.indexer();
    let rows: Vec<TargetInfo> = if let Some(token) = token {
        let dir = resolve_location(completer, token)?;
        indexer.index_one(&dir)?.iter().map(TargetInfo::from).collect()
    } else if inv.recursive {
        indexer.index_all(&inv.repo_root).iter().map(TargetInfo::from).collect()
    } else {
        let file = indexer
            .find_best_definition(&inv.working_dir, &inv.repo_root)
            .context("no justfile found in current directory or repo root")?;
        let dir = file.parent().unwrap_or(Path::new("."));
        indexer.index_one(dir)?.iter().map(TargetInfo::from).collect()
    };
    let mut out = io::stdout().lock();
    render::write_targets(&mut out, &rows, inv.format)?;
    Ok(())
}

fn run(inv: &Invocation, completer: &Completer, runner: &Runner, args: RunArgs) -> Result<ExitCode> {
    let Some((first, rest)) = args.words.split_first() else {
        anyhow::bail!("missing target");
    };
    // a completed candidate may arrive as `name (@location)`
    let (target, qualifier) = split_display(first);
    let (token, extra) = match rest.split_first() {
        Some((t, extra)) if location::is_token(t) => (Some(t.as_str()), extra),
        _ => (qualifier, rest),
    };

    let indexer = completer.indexer();
    let file = if let Some(token) = token {
        let dir = resolve_location(completer, token)?;
        indexer.find_definition(&dir).with_context(|| format!("no justfile found in {}", dir.display()))?
    } else if let Some(dir) = &args.directory {
        indexer.find_definition(dir).with_context(|| format!("no justfile found in {}", dir.display()))?
    } else {
        indexer
            .find_best_definition(&inv.working_dir, &inv.repo_root)
            .context("no justfile found in current directory or repo root")?
    };

    runner::validate_target(indexer.extractor(), &file, target)?;

    let mut stdout = io::stdout();
    let echo: Option<&mut dyn Write> = if inv.echo_commands() { Some(&mut stdout) } else { None };
    let status = runner.run(&file, target, extra, echo)?;
    Ok(match status.code() {
        Some(0) => ExitCode::SUCCESS,
        Some(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        None => ExitCode::FAILURE,
    })
}

fn complete(completer: &Completer, what: CompleteCmd) -> Result<()> {
    let candidates = match what {
        CompleteCmd::Targets { mut words } => {
            let query = words.pop().unwrap_or_default();
            completer.targets(&words, &query)?
        }
        CompleteCmd::Locations { query } => completer.locations(query.as_deref().unwrap_or("")),
    };
    let mut out = io::stdout().lock();
    for c in candidates {
        writeln!(out, "{c}")?;
    }
    Ok(())
}
