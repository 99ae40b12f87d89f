//! External commands as loss functions.
//!
//! A [`CommandTemplate`] holds the user's command with `%` placeholders. For
//! each candidate rate it is instantiated into a [`CommandInvocation`], which
//! the [`ProcessRunner`] executes with stdout and stderr merged into one
//! ordered stream of lines. [`CommandProblem`] ties the two together as a
//! [`LossProblem`], reading the loss from the last `average loss = <value>`
//! line the command printed.
//!
//! [`LossProblem`]: hypersect_core::LossProblem

mod loss;
mod problem;
mod runner;
mod template;

pub use loss::{LOSS_MARKER, last_loss, parse_loss_line};
pub use problem::{CommandProblem, LossError, TimeoutPolicy};
pub use runner::{FAILED_STATUS, ProcessResult, ProcessRunner, Termination};
pub use template::{CommandInvocation, CommandTemplate, PLACEHOLDER, TemplateError};
