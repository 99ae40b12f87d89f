use std::{env, fmt, path::Path};

use thiserror::Error;

/// Marker replaced by the candidate rate in every command token.
pub const PLACEHOLDER: char = '%';

/// Tool whose name alone is enough for a program to look plausible.
const KNOWN_TOOL: &str = "vw";

/// Errors that can occur when building a command template.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TemplateError {
    #[error("no command given")]
    Empty,

    #[error("no command argument contains the `%` placeholder")]
    MissingPlaceholder,
}

/// A command line with at least one `%` placeholder.
///
/// Immutable once built. Use [`CommandTemplate::instantiate`] to produce the
/// concrete command for a rate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    program: String,
    args: Vec<String>,
}

impl CommandTemplate {
    /// Creates a template from command tokens, program first.
    ///
    /// # Errors
    ///
    /// Returns an error if `tokens` is empty or no token contains [`PLACEHOLDER`].
    pub fn new<I, S>(tokens: I) -> Result<Self, TemplateError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tokens = tokens.into_iter().map(Into::into);
        let program = tokens.next().ok_or(TemplateError::Empty)?;
        let args: Vec<String> = tokens.collect();

        let has_placeholder =
            program.contains(PLACEHOLDER) || args.iter().any(|arg| arg.contains(PLACEHOLDER));
        if !has_placeholder {
            return Err(TemplateError::MissingPlaceholder);
        }

        Ok(Self { program, args })
    }

    /// Returns the program token.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Returns the tokens after the program.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Substitutes `rate` for every placeholder in every token.
    ///
    /// The rate is rendered with the shortest text that parses back to the
    /// same `f64`, so the command sees exactly the rate being evaluated.
    #[must_use]
    pub fn instantiate(&self, rate: f64) -> CommandInvocation {
        let rendered = rate.to_string();
        let fill = |token: &String| token.replace(PLACEHOLDER, &rendered);

        CommandInvocation {
            program: fill(&self.program),
            args: self.args.iter().map(fill).collect(),
        }
    }

    /// Loose sanity check on the program token.
    ///
    /// True if the program is an existing file path, resolves through `PATH`,
    /// or mentions a known training tool. This is not a security check.
    #[must_use]
    pub fn program_looks_runnable(&self) -> bool {
        let program = Path::new(&self.program);
        if program.components().count() > 1 {
            return program.is_file();
        }

        let on_path = env::var_os("PATH")
            .is_some_and(|paths| env::split_paths(&paths).any(|dir| dir.join(program).is_file()));

        on_path || self.program.contains(KNOWN_TOOL)
    }
}

/// A concrete command ready to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    program: String,
    args: Vec<String>,
}

impl CommandInvocation {
    /// Creates an invocation directly, without a template.
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the program token.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Returns the tokens after the program.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for CommandInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}
