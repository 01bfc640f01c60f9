//! Command templates: the command line an action maps to.
//!
//! A template is written either as one shell-style string (`uv run {target}`)
//! or as an explicit token list. Strings are split with POSIX word rules but
//! never handed to a shell; the first token is the program.
//!
//! `{name}` inside a token is replaced by the declared positional argument of
//! that name. Tokens that reference an absent optional argument are dropped,
//! and arguments beyond the declared ones are appended verbatim.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::config::ActionArg;
use crate::error::{MonoError, Result};

static PLACEHOLDER_RE: OnceLock<Regex> = OnceLock::new();

fn placeholder_re() -> &'static Regex {
    PLACEHOLDER_RE.get_or_init(|| Regex::new(r"\{([A-Za-z0-9_\-]+)\}").unwrap())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommandTemplate {
    Line(String),
    Argv(Vec<String>),
}

/// A template with its arguments bound: ready to hand to a launcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandTemplate {
    pub fn tokens(&self) -> Result<Vec<String>> {
        match self {
            CommandTemplate::Line(line) => {
                shlex::split(line).ok_or_else(|| MonoError::InvalidTemplate(line.clone()))
            }
            CommandTemplate::Argv(argv) => Ok(argv.clone()),
        }
    }

    /// The program the template runs, if the template parses.
    pub fn program(&self) -> Option<String> {
        self.tokens().ok().and_then(|t| t.into_iter().next())
    }

    /// Placeholder names referenced anywhere in the template, in order of
    /// first appearance.
    pub fn placeholders(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for token in self.tokens().unwrap_or_default() {
            for caps in placeholder_re().captures_iter(&token) {
                let name = caps[1].to_string();
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    pub fn render(&self, declared: &[ActionArg], values: &[String]) -> Result<RenderedCommand> {
        let mut argv: Vec<String> = Vec::new();

        for token in self.tokens()? {
            let mut dropped = false;
            let rendered = placeholder_re().replace_all(&token, |caps: &Captures| {
                let name = &caps[1];
                match declared.iter().position(|a| a.name == name) {
                    Some(i) => match values.get(i) {
                        Some(value) => value.clone(),
                        None => {
                            dropped = true;
                            String::new()
                        }
                    },
                    None => caps[0].to_string(),
                }
            });
            if !dropped {
                argv.push(rendered.into_owned());
            }
        }

        argv.extend(values.iter().skip(declared.len()).cloned());

        let mut argv = argv.into_iter();
        let program = argv
            .next()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| MonoError::InvalidTemplate(self.to_string()))?;
        Ok(RenderedCommand {
            program,
            args: argv.collect(),
        })
    }
}

impl std::fmt::Display for CommandTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandTemplate::Line(line) => f.write_str(line),
            CommandTemplate::Argv(argv) => {
                let quoted: Vec<Cow<'_, str>> = argv.iter().map(|t| quote_token(t)).collect();
                f.write_str(&quoted.join(" "))
            }
        }
    }
}

pub(crate) fn quote_token(token: &str) -> Cow<'_, str> {
    shlex::try_quote(token).unwrap_or(Cow::Borrowed(token))
}
