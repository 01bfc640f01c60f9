//! The command dispatcher: `(namespace, action, args)` → one child process.
//!
//! Lookups are a flat two-level walk over the [`Config`] table. Every
//! validation failure is raised before the launcher is touched, so an unknown
//! namespace or action never spawns anything. The exit code the launcher
//! reports is returned unchanged; a non-zero code is a result, not an error.

use std::path::PathBuf;

use crate::config::{Config, NamespaceConfig, Step};
use crate::error::{MonoError, Result};
use crate::invocation::Invocation;
use crate::launcher::{CommandSpec, Launcher};
use crate::paths;

pub struct Dispatcher<'a, L> {
    config: &'a Config,
    root: PathBuf,
    launcher: L,
}

impl<'a, L: Launcher> Dispatcher<'a, L> {
    pub fn new(config: &'a Config, root: impl Into<PathBuf>, launcher: L) -> Self {
        Self {
            config,
            root: root.into(),
            launcher,
        }
    }

    /// Validate and render one action without running it.
    pub fn resolve(
        &self,
        namespace: &str,
        action: Option<&str>,
        args: &[String],
    ) -> Result<CommandSpec> {
        let ns = self.namespace(namespace)?;

        let action_name = action.ok_or_else(|| MonoError::MissingAction {
            namespace: ns.name.clone(),
            available: ns.action_names().join(", "),
        })?;

        let action = ns
            .action(action_name)
            .ok_or_else(|| MonoError::UnknownAction {
                namespace: ns.name.clone(),
                action: action_name.to_string(),
                available: ns.action_names().join(", "),
            })?;

        if let Some(missing) = action
            .args
            .iter()
            .enumerate()
            .find(|(i, arg)| arg.required && args.len() <= *i)
            .map(|(_, arg)| arg)
        {
            return Err(MonoError::MissingArgument {
                namespace: ns.name.clone(),
                action: action.name.clone(),
                arg: missing.name.clone(),
                usage: format!("mono {}", action.usage(&ns.name)),
            });
        }

        let rendered = action.command.render(&action.args, args)?;
        Ok(CommandSpec {
            namespace: ns.name.clone(),
            cwd: paths::namespace_dir(&self.root, &ns.root),
            program: rendered.program,
            args: rendered.args,
        })
    }

    /// Run one action and return the child's exit code.
    pub fn dispatch(&self, namespace: &str, action: &str, args: &[String]) -> Result<i32> {
        self.dispatch_optional(namespace, Some(action), args)
    }

    fn dispatch_optional(
        &self,
        namespace: &str,
        action: Option<&str>,
        args: &[String],
    ) -> Result<i32> {
        let spec = self.resolve(namespace, action, args)?;
        tracing::debug!(
            namespace,
            action = action.unwrap_or_default(),
            cwd = %spec.cwd.display(),
            "dispatch"
        );
        self.launcher.launch(&spec)
    }

    /// Run steps in order, stopping at the first non-zero exit code or error.
    /// An empty list succeeds; repeated steps run each time.
    pub fn dispatch_composite(&self, steps: &[Step]) -> Result<i32> {
        for step in steps {
            let code = self.dispatch(&step.namespace, &step.action, &[])?;
            if code != 0 {
                tracing::debug!(step = %step, code, "composite step failed, stopping");
                return Ok(code);
            }
        }
        Ok(0)
    }

    /// Run a named composite from the table.
    pub fn run_composite(&self, name: &str) -> Result<i32> {
        let composite = self
            .config
            .composite(name)
            .ok_or_else(|| self.unknown_namespace(name))?;
        self.dispatch_composite(&composite.steps)
    }

    /// Execute a parsed invocation. `List` has nothing to run and yields 0.
    pub fn run(&self, invocation: &Invocation) -> Result<i32> {
        match invocation {
            Invocation::List => Ok(0),
            Invocation::Composite { name } => self.run_composite(name),
            Invocation::Action {
                namespace,
                action,
                args,
            } => self.dispatch_optional(namespace, action.as_deref(), args),
        }
    }

    fn namespace(&self, name: &str) -> Result<&'a NamespaceConfig> {
        self.config
            .namespace(name)
            .ok_or_else(|| self.unknown_namespace(name))
    }

    fn unknown_namespace(&self, name: &str) -> MonoError {
        MonoError::UnknownNamespace {
            name: name.to_string(),
            namespaces: self.config.namespace_names().join(", "),
            composites: self.config.composite_names().join(", "),
        }
    }
}
