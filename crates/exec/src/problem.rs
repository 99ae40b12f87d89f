use std::fmt::Write as _;

use thiserror::Error;
use tracing::warn;

use hypersect_core::LossProblem;

use crate::{CommandInvocation, CommandTemplate, ProcessResult, Termination, last_loss};

/// What to do when a command is killed for running past its deadline.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum TimeoutPolicy {
    /// Treat the timeout like any other failed run.
    #[default]
    Abort,

    /// Score the rate with a fixed loss and keep searching.
    Penalize(f64),
}

/// Errors that can occur when reading a loss from a command run.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LossError {
    #[error("`{command}` {termination} with status {status}{}", output_block(.output))]
    Failed {
        command: String,
        status: i32,
        termination: Termination,
        output: Vec<String>,
    },

    #[error("`{command}` printed no `average loss = <value>` line{}", output_block(.output))]
    MissingLoss {
        command: String,
        output: Vec<String>,
    },
}

impl LossError {
    /// Returns the captured output of the failed run.
    #[must_use]
    pub fn output(&self) -> &[String] {
        match self {
            Self::Failed { output, .. } | Self::MissingLoss { output, .. } => output,
        }
    }
}

fn output_block(lines: &[String]) -> String {
    if lines.is_empty() {
        return String::from(" and no output");
    }

    let mut block = String::from("; output:");
    for line in lines {
        let _ = write!(block, "\n  {line}");
    }
    block
}

/// A loss read from the output of an external command.
///
/// Each rate is substituted into the template, the resulting command is run,
/// and the loss is taken from the last `average loss = <value>` line. Runs
/// that exit nonzero or never report a loss are errors.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandProblem {
    template: CommandTemplate,
    on_timeout: TimeoutPolicy,
}

impl CommandProblem {
    /// Creates a problem that aborts on timed out runs.
    #[must_use]
    pub fn new(template: CommandTemplate) -> Self {
        Self {
            template,
            on_timeout: TimeoutPolicy::default(),
        }
    }

    /// Sets how timed out runs are scored.
    #[must_use]
    pub fn with_timeout_policy(mut self, policy: TimeoutPolicy) -> Self {
        self.on_timeout = policy;
        self
    }

    /// Returns the command template.
    #[must_use]
    pub fn template(&self) -> &CommandTemplate {
        &self.template
    }
}

impl LossProblem for CommandProblem {
    type Input = CommandInvocation;
    type Output = ProcessResult;
    type Error = LossError;

    fn input(&self, x: f64) -> Result<Self::Input, Self::Error> {
        Ok(self.template.instantiate(x))
    }

    fn loss(&self, input: &Self::Input, output: &Self::Output) -> Result<f64, Self::Error> {
        if let (Termination::TimedOut, TimeoutPolicy::Penalize(penalty)) =
            (output.termination, self.on_timeout)
        {
            warn!(command = %input, loss = penalty, "scoring timed out run with penalty loss");
            return Ok(penalty);
        }

        if !output.success() {
            return Err(LossError::Failed {
                command: input.to_string(),
                status: output.status,
                termination: output.termination,
                output: output.lines.clone(),
            });
        }

        last_loss(&output.lines).ok_or_else(|| LossError::MissingLoss {
            command: input.to_string(),
            output: output.lines.clone(),
        })
    }
}
