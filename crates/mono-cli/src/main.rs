mod cmd;
mod output;
mod root;

use clap::Parser;
use cmd::run::RunOptions;
use mono_core::{Invocation, MonoError};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "mono",
    about = "Run workspace commands from the monorepo root: mono <namespace> <action> [args...]",
    version
)]
struct Cli {
    /// Monorepo root (default: auto-detect from mono.yaml or .git/)
    #[arg(long, env = "MONO_ROOT")]
    root: Option<PathBuf>,

    /// Command table to use instead of <root>/mono.yaml
    #[arg(long, env = "MONO_CONFIG")]
    config: Option<PathBuf>,

    /// Output as JSON (with --list and --validate)
    #[arg(long, short = 'j')]
    json: bool,

    /// Print namespaces, actions, and composites
    #[arg(long, short = 'l', conflicts_with_all = ["validate", "init"])]
    list: bool,

    /// Check the command table and print findings
    #[arg(long, conflicts_with = "init")]
    validate: bool,

    /// Write the built-in command table to mono.yaml
    #[arg(long)]
    init: bool,

    /// Print the commands that would run without running them
    #[arg(long, short = 'n')]
    dry_run: bool,

    /// Do not echo commands before running them
    #[arg(long, short = 'q')]
    quiet: bool,

    /// <namespace> <action> [args...], <composite>, or help
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "COMMAND")]
    command: Vec<String>,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(tracing::Level::WARN.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());
    tracing::debug!(root = %root.display(), "resolved monorepo root");

    let code = match run(&cli, &root) {
        Ok(code) => code,
        Err(e) => report(&e),
    };
    std::process::exit(code);
}

fn run(cli: &Cli, root: &Path) -> anyhow::Result<i32> {
    if cli.init {
        cmd::init::run(root)?;
        return Ok(0);
    }

    let config = cmd::load_config(root, cli.config.as_deref())?;

    if cli.validate {
        return cmd::validate::run(&config, cli.json);
    }

    cmd::validate::ensure_dispatchable(&config)?;

    let invocation = if cli.list {
        Invocation::List
    } else {
        Invocation::parse(&cli.command, &config)?
    };

    match invocation {
        Invocation::List => {
            cmd::list::run(&config, root, cli.json)?;
            Ok(0)
        }
        other => cmd::run::run(
            &config,
            root,
            &other,
            RunOptions {
                dry_run: cli.dry_run,
                quiet: cli.quiet,
            },
        ),
    }
}

/// Print an error and pick the exit code. Dispatcher errors carry their own
/// message and code; anything else prints its full chain and exits 1.
fn report(e: &anyhow::Error) -> i32 {
    match e.downcast_ref::<MonoError>() {
        Some(err) if is_dispatch_error(err) => {
            eprintln!("{err}");
            err.exit_code()
        }
        _ => {
            eprintln!("error: {e:#}");
            1
        }
    }
}

fn is_dispatch_error(err: &MonoError) -> bool {
    matches!(
        err,
        MonoError::UnknownNamespace { .. }
            | MonoError::UnknownAction { .. }
            | MonoError::MissingAction { .. }
            | MonoError::MissingArgument { .. }
            | MonoError::MissingExecutable { .. }
            | MonoError::SpawnFailed { .. }
    )
}
