//! Process launching for dispatched actions.
//!
//! The dispatcher never spawns processes itself; it hands a fully rendered
//! [`CommandSpec`] to a [`Launcher`]. [`SystemLauncher`] runs the program with
//! the namespace root as its working directory and all three standard streams
//! inherited, so installers and linters draw their progress output directly
//! on the terminal.

use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use crate::error::{MonoError, Result};
use crate::template::quote_token;

/// A rendered action, bound to the directory it runs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub namespace: String,
    pub cwd: PathBuf,
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn command_line(&self) -> String {
        std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|t| quote_token(t))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

pub trait Launcher {
    /// Run the command to completion and return its exit code.
    fn launch(&self, spec: &CommandSpec) -> Result<i32>;
}

impl<L: Launcher + ?Sized> Launcher for &L {
    fn launch(&self, spec: &CommandSpec) -> Result<i32> {
        (**self).launch(spec)
    }
}

/// Spawns real child processes and blocks until they exit.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn launch(&self, spec: &CommandSpec) -> Result<i32> {
        if !spec.cwd.is_dir() {
            return Err(MonoError::MissingRoot {
                namespace: spec.namespace.clone(),
                path: spec.cwd.display().to_string(),
            });
        }

        tracing::debug!(
            namespace = %spec.namespace,
            cwd = %spec.cwd.display(),
            program = %spec.program,
            "spawning"
        );

        let status = Command::new(&spec.program)
            .args(&spec.args)
            .current_dir(&spec.cwd)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| spawn_error(&spec.program, e))?;

        let code = exit_code(status);
        tracing::debug!(program = %spec.program, code, "child exited");
        Ok(code)
    }
}

/// Resolves commands without running them; every launch succeeds.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunLauncher;

impl Launcher for DryRunLauncher {
    fn launch(&self, spec: &CommandSpec) -> Result<i32> {
        tracing::debug!(program = %spec.program, "dry run, not spawning");
        Ok(0)
    }
}

/// Prints `[namespace] command line` to stderr before delegating, the way
/// `just` echoes recipe lines.
#[derive(Debug, Clone)]
pub struct EchoLauncher<L> {
    inner: L,
}

impl<L: Launcher> EchoLauncher<L> {
    pub fn new(inner: L) -> Self {
        Self { inner }
    }
}

impl<L: Launcher> Launcher for EchoLauncher<L> {
    fn launch(&self, spec: &CommandSpec) -> Result<i32> {
        eprintln!("[{}] {}", spec.namespace, spec.command_line());
        self.inner.launch(spec)
    }
}

fn spawn_error(program: &str, source: std::io::Error) -> MonoError {
    if source.kind() == std::io::ErrorKind::NotFound {
        MonoError::MissingExecutable {
            program: program.to_string(),
            source,
        }
    } else {
        MonoError::SpawnFailed {
            program: program.to_string(),
            source,
        }
    }
}

/// A child killed by a signal reports `128 + signal`, as a shell would.
#[cfg(unix)]
pub fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    match (status.code(), status.signal()) {
        (Some(code), _) => code,
        (None, Some(signal)) => 128 + signal,
        (None, None) => 1,
    }
}

#[cfg(not(unix))]
pub fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}

/// Whether `program` resolves on `PATH` (or relative to `cwd`).
pub fn program_available(program: &str, cwd: &Path) -> bool {
    which::which_in(program, std::env::var_os("PATH"), cwd).is_ok()
}
