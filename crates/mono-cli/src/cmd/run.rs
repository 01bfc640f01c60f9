use mono_core::{Config, Dispatcher, DryRunLauncher, EchoLauncher, Invocation, Launcher, SystemLauncher};
use std::path::Path;

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub dry_run: bool,
    pub quiet: bool,
}

/// Dispatch a namespace action or composite and return the exit code to
/// report. A dry run always echoes, since printing is all it does.
pub fn run(
    config: &Config,
    root: &Path,
    invocation: &Invocation,
    opts: RunOptions,
) -> anyhow::Result<i32> {
    let launcher: Box<dyn Launcher> = match (opts.dry_run, opts.quiet) {
        (true, _) => Box::new(EchoLauncher::new(DryRunLauncher)),
        (false, true) => Box::new(SystemLauncher),
        (false, false) => Box::new(EchoLauncher::new(SystemLauncher)),
    };

    let dispatcher = Dispatcher::new(config, root, launcher.as_ref());
    let code = dispatcher.run(invocation)?;
    Ok(code)
}
