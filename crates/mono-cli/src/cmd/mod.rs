pub mod init;
pub mod list;
pub mod run;
pub mod validate;

use anyhow::Context;
use mono_core::Config;
use std::path::Path;

/// Load the command table: `--config` if given, else `<root>/mono.yaml`,
/// else the built-in table.
pub fn load_config(root: &Path, explicit: Option<&Path>) -> anyhow::Result<Config> {
    match explicit {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("failed to load command table from {}", path.display())),
        None => Config::load(root).context("failed to load command table"),
    }
}
