use anyhow::Context;
use mono_core::config::BUILTIN_CONFIG;
use mono_core::{io, paths};
use std::path::Path;

/// Write the built-in command table to `mono.yaml` so it can be edited.
pub fn run(root: &Path) -> anyhow::Result<()> {
    let path = paths::config_path(root);
    let written = io::write_if_missing(&path, BUILTIN_CONFIG.as_bytes())
        .with_context(|| format!("failed to write {}", path.display()))?;

    if written {
        println!("Created {}", path.display());
    } else {
        println!("{} already exists; leaving it untouched.", path.display());
    }
    Ok(())
}
