use crate::config::Config;
use crate::error::{MonoError, Result};

/// One user request, parsed from the positional command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// `mono`, `mono help`: print the command table.
    List,
    /// `mono lint`: run a named composite.
    Composite { name: String },
    /// `mono py lint`, `mono py-pkg run example`.
    Action {
        namespace: String,
        action: Option<String>,
        args: Vec<String>,
    },
}

impl Invocation {
    /// Classify `tokens` against the table. Only composite names are decided
    /// here; namespace and action checks happen at dispatch time so their
    /// errors can list the alternatives.
    pub fn parse(tokens: &[String], config: &Config) -> Result<Self> {
        let Some((first, rest)) = tokens.split_first() else {
            return Ok(Invocation::List);
        };

        if first == "help" && rest.is_empty() {
            return Ok(Invocation::List);
        }

        if config.composite(first).is_some() {
            if !rest.is_empty() {
                return Err(MonoError::CompositeArguments(first.clone()));
            }
            return Ok(Invocation::Composite {
                name: first.clone(),
            });
        }

        let (action, args) = match rest.split_first() {
            Some((action, args)) => (Some(action.clone()), args.to_vec()),
            None => (None, Vec::new()),
        };
        Ok(Invocation::Action {
            namespace: first.clone(),
            action,
            args,
        })
    }
}
