use crate::error::{MonoError, Result};
use crate::paths;
use crate::template::CommandTemplate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Command table used when the monorepo has no `mono.yaml`.
pub const BUILTIN_CONFIG: &str = include_str!("builtin.yaml");

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

impl ConfigWarning {
    fn warning(message: String) -> Self {
        Self {
            level: WarnLevel::Warning,
            message,
        }
    }

    fn error(message: String) -> Self {
        Self {
            level: WarnLevel::Error,
            message,
        }
    }
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActionArg {
    pub name: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActionConfig {
    pub name: String,
    pub command: CommandTemplate,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<ActionArg>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ActionConfig {
    /// `py-pkg run <target>`; optional arguments render as `[name]`.
    pub fn usage(&self, namespace: &str) -> String {
        let mut parts = vec![namespace.to_string(), self.name.clone()];
        for arg in &self.args {
            if arg.required {
                parts.push(format!("<{}>", arg.name));
            } else {
                parts.push(format!("[{}]", arg.name));
            }
        }
        parts.join(" ")
    }
}

// ---------------------------------------------------------------------------
// Namespaces
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NamespaceConfig {
    pub name: String,
    /// Working directory for every action, relative to the monorepo root.
    pub root: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub actions: Vec<ActionConfig>,
}

impl NamespaceConfig {
    pub fn action(&self, name: &str) -> Option<&ActionConfig> {
        self.actions.iter().find(|a| a.name == name)
    }

    pub fn action_names(&self) -> Vec<&str> {
        self.actions.iter().map(|a| a.name.as_str()).collect()
    }
}

// ---------------------------------------------------------------------------
// Composites
// ---------------------------------------------------------------------------

/// One `(namespace, action)` pair of a composite; written `[py, lint]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct Step {
    pub namespace: String,
    pub action: String,
}

impl Step {
    pub fn new(namespace: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            action: action.into(),
        }
    }
}

impl From<(String, String)> for Step {
    fn from((namespace, action): (String, String)) -> Self {
        Self { namespace, action }
    }
}

impl From<Step> for (String, String) {
    fn from(step: Step) -> Self {
        (step.namespace, step.action)
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.namespace, self.action)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompositeConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub namespaces: Vec<NamespaceConfig>,
    #[serde(default)]
    pub composites: Vec<CompositeConfig>,
}

fn default_version() -> u32 {
    1
}

impl Config {
    pub fn builtin() -> Result<Self> {
        Self::parse(BUILTIN_CONFIG)
    }

    pub fn parse(yaml: &str) -> Result<Self> {
        let cfg: Config = serde_yaml::from_str(yaml)?;
        Ok(cfg)
    }

    /// Load `mono.yaml` from the monorepo root, or the built-in table when
    /// the file does not exist.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            tracing::debug!(root = %root.display(), "no mono.yaml, using built-in command table");
            return Self::builtin();
        }
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path).map_err(|e| {
            MonoError::InvalidConfig(format!("cannot read {}: {e}", path.display()))
        })?;
        tracing::debug!(path = %path.display(), "loading command table");
        Self::parse(&data)
    }

    pub fn namespace(&self, name: &str) -> Option<&NamespaceConfig> {
        self.namespaces.iter().find(|n| n.name == name)
    }

    pub fn composite(&self, name: &str) -> Option<&CompositeConfig> {
        self.composites.iter().find(|c| c.name == name)
    }

    pub fn namespace_names(&self) -> Vec<&str> {
        self.namespaces.iter().map(|n| n.name.as_str()).collect()
    }

    pub fn composite_names(&self) -> Vec<&str> {
        self.composites.iter().map(|c| c.name.as_str()).collect()
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        // 1. Namespaces: unique slug names, each action well-formed
        let mut seen_ns = HashSet::new();
        for ns in &self.namespaces {
            if !seen_ns.insert(ns.name.as_str()) {
                warnings.push(ConfigWarning::error(format!(
                    "duplicate namespace '{}'",
                    ns.name
                )));
            }
            if !paths::is_valid_name(&ns.name) {
                warnings.push(ConfigWarning::warning(format!(
                    "namespace '{}' is not a lowercase slug",
                    ns.name
                )));
            }
            if ns.actions.is_empty() {
                warnings.push(ConfigWarning::warning(format!(
                    "namespace '{}' has no actions",
                    ns.name
                )));
            }

            let mut seen_actions = HashSet::new();
            for action in &ns.actions {
                if !seen_actions.insert(action.name.as_str()) {
                    warnings.push(ConfigWarning::error(format!(
                        "duplicate action '{}' in namespace '{}'",
                        action.name, ns.name
                    )));
                }
                if !paths::is_valid_name(&action.name) {
                    warnings.push(ConfigWarning::warning(format!(
                        "action '{}' in namespace '{}' is not a lowercase slug",
                        action.name, ns.name
                    )));
                }
                validate_action(&ns.name, action, &mut warnings);
            }
        }

        // 2. Composites: unique, not shadowing a namespace, steps resolve
        let mut seen_composites = HashSet::new();
        for composite in &self.composites {
            if !seen_composites.insert(composite.name.as_str()) {
                warnings.push(ConfigWarning::error(format!(
                    "duplicate composite '{}'",
                    composite.name
                )));
            }
            if self.namespace(&composite.name).is_some() {
                warnings.push(ConfigWarning::error(format!(
                    "composite '{}' has the same name as a namespace",
                    composite.name
                )));
            }
            if composite.steps.is_empty() {
                warnings.push(ConfigWarning::warning(format!(
                    "composite '{}' has no steps",
                    composite.name
                )));
            }
            for step in &composite.steps {
                let action = self
                    .namespace(&step.namespace)
                    .and_then(|ns| ns.action(&step.action));
                match action {
                    None => warnings.push(ConfigWarning::error(format!(
                        "composite '{}' step '{}' does not match any namespace action",
                        composite.name, step
                    ))),
                    Some(a) if a.args.iter().any(|arg| arg.required) => {
                        warnings.push(ConfigWarning::error(format!(
                            "composite '{}' step '{}' needs arguments a composite cannot supply",
                            composite.name, step
                        )))
                    }
                    Some(_) => {}
                }
            }
        }

        warnings
    }
}

fn validate_action(namespace: &str, action: &ActionConfig, warnings: &mut Vec<ConfigWarning>) {
    let tokens = match action.command.tokens() {
        Ok(t) => t,
        Err(_) => {
            warnings.push(ConfigWarning::error(format!(
                "action '{namespace} {}' has an unparsable command: {}",
                action.name, action.command
            )));
            return;
        }
    };
    if tokens.first().map_or(true, |p| p.trim().is_empty()) {
        warnings.push(ConfigWarning::error(format!(
            "action '{namespace} {}' has an empty command",
            action.name
        )));
    }

    for placeholder in action.command.placeholders() {
        if !action.args.iter().any(|a| a.name == placeholder) {
            warnings.push(ConfigWarning::warning(format!(
                "action '{namespace} {}' references undeclared argument '{{{placeholder}}}'",
                action.name
            )));
        }
    }

    let mut optional_seen = false;
    for arg in &action.args {
        if arg.required && optional_seen {
            warnings.push(ConfigWarning::error(format!(
                "action '{namespace} {}' declares required argument '{}' after an optional one",
                action.name, arg.name
            )));
        }
        optional_seen |= !arg.required;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
