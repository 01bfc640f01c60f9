use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// File constants
// ---------------------------------------------------------------------------

pub const CONFIG_FILE: &str = "mono.yaml";
pub const GIT_DIR: &str = ".git";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// Working directory for a namespace. Absolute namespace roots are kept as-is.
pub fn namespace_dir(root: &Path, namespace_root: &Path) -> PathBuf {
    if namespace_root.is_absolute() {
        namespace_root.to_path_buf()
    } else {
        root.join(namespace_root)
    }
}

// ---------------------------------------------------------------------------
// Name validation
// ---------------------------------------------------------------------------

static NAME_RE: OnceLock<Regex> = OnceLock::new();

fn name_re() -> &'static Regex {
    NAME_RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9\-]*[a-z0-9]$|^[a-z0-9]$").unwrap())
}

/// Namespace, action, and composite names are lowercase slugs.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.len() <= 64 && name_re().is_match(name)
}
