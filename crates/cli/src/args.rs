use std::time::Duration;

use clap::{CommandFactory, Parser, error::ErrorKind};

use hypersect_exec::{CommandTemplate, TemplateError, TimeoutPolicy};
use hypersect_solvers::optimization::golden_section::{
    Config, DEFAULT_MAX_ITERS, DEFAULT_TOLERANCE,
};

/// Golden section search for the rate that minimizes a command's loss.
///
/// Each `%` in COMMAND is replaced by a candidate rate. The command must exit
/// with status 0 and print a line `average loss = <value>`; the last such
/// line is the loss for that rate.
#[derive(Parser, Debug)]
#[command(name = "hypersect", version)]
#[command(override_usage = "hypersect [OPTIONS] <LOWER_BOUND> <UPPER_BOUND> [TOLERANCE] <COMMAND>...")]
pub struct Cli {
    /// One end of the search interval.
    #[arg(allow_negative_numbers = true)]
    pub lower_bound: f64,

    /// The other end of the search interval.
    #[arg(allow_negative_numbers = true)]
    pub upper_bound: f64,

    /// Optional relative tolerance in (0, 1), then the command to run.
    #[arg(
        value_name = "COMMAND",
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<String>,

    /// Kill each command after this many seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<f64>,

    /// Score timed out commands with this loss instead of aborting.
    #[arg(long, value_name = "LOSS", requires = "timeout", allow_negative_numbers = true)]
    pub timeout_loss: Option<f64>,

    /// Maximum number of search steps.
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_ITERS)]
    pub max_iters: usize,

    /// Stop after this many distinct rates have been evaluated.
    #[arg(long, value_name = "N")]
    pub max_evals: Option<usize>,

    /// Do not print progress dots while a command runs.
    #[arg(long)]
    pub no_progress: bool,

    /// Log filter used when `RUST_LOG` is not set.
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    pub log_level: String,
}

/// Everything a search run needs, checked and ready to use.
#[derive(Debug)]
pub struct Settings {
    pub bounds: [f64; 2],
    pub config: Config,
    pub template: CommandTemplate,
    pub timeout: Option<Duration>,
    pub on_timeout: TimeoutPolicy,
    pub max_evals: Option<usize>,
    pub progress: bool,
}

impl Cli {
    /// Checks the parsed arguments and builds the run settings.
    ///
    /// # Errors
    ///
    /// Returns a usage error if a bound is not finite, the tolerance is out of
    /// range, the command is missing or has no placeholder, or an option
    /// value is invalid.
    pub fn settings(&self) -> Result<Settings, clap::Error> {
        for (name, bound) in [
            ("LOWER_BOUND", self.lower_bound),
            ("UPPER_BOUND", self.upper_bound),
        ] {
            if !bound.is_finite() {
                return Err(invalid(format!("{name} must be a finite number, got {bound}")));
            }
        }

        let (tolerance, command) = split_tolerance(&self.command);
        let tolerance = tolerance.unwrap_or(DEFAULT_TOLERANCE);
        let config = Config::new(tolerance, self.max_iters).map_err(invalid)?;

        let template = CommandTemplate::new(command.iter().cloned()).map_err(|error| match error {
            TemplateError::Empty => usage(ErrorKind::MissingRequiredArgument, error),
            TemplateError::MissingPlaceholder => invalid(error),
        })?;

        let timeout = self.timeout.map(parse_timeout).transpose()?;
        let on_timeout = self
            .timeout_loss
            .map_or(TimeoutPolicy::Abort, TimeoutPolicy::Penalize);

        if self.max_evals == Some(0) {
            return Err(invalid("--max-evals must be at least 1"));
        }

        Ok(Settings {
            bounds: [self.lower_bound, self.upper_bound],
            config,
            template,
            timeout,
            on_timeout,
            max_evals: self.max_evals,
            progress: !self.no_progress,
        })
    }
}

/// Splits a leading numeric token off as the tolerance.
fn split_tolerance(command: &[String]) -> (Option<f64>, &[String]) {
    match command.split_first() {
        Some((first, rest)) => match first.parse::<f64>() {
            Ok(tolerance) => (Some(tolerance), rest),
            Err(_) => (None, command),
        },
        None => (None, command),
    }
}

fn parse_timeout(secs: f64) -> Result<Duration, clap::Error> {
    Duration::try_from_secs_f64(secs)
        .map_err(|_| invalid(format!("--timeout must be a non-negative number of seconds, got {secs}")))
}

fn invalid(message: impl std::fmt::Display) -> clap::Error {
    usage(ErrorKind::ValueValidation, message)
}

fn usage(kind: ErrorKind, message: impl std::fmt::Display) -> clap::Error {
    Cli::command().error(kind, message)
}
