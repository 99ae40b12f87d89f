//! Command-line front end for hypersect.
//!
//! Parses the bounds, tolerance and command template, runs golden section
//! search with the command as the loss, and prints `best<TAB>loss` on stdout.
//! Everything else goes to stderr.

mod args;
mod budget;
mod format;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use hypersect_exec::{CommandProblem, ProcessRunner};
use hypersect_solvers::optimization::{Session, golden_section};

use args::{Cli, Settings};
use budget::EvalBudget;
use format::general;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let settings = cli.settings().unwrap_or_else(|error| error.exit());
    run(settings)
}

fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(settings: Settings) -> Result<()> {
    let Settings {
        bounds,
        config,
        template,
        timeout,
        on_timeout,
        max_evals,
        progress,
    } = settings;

    if !template.program_looks_runnable() {
        warn!(
            program = template.program(),
            "program not found as a file or on PATH; trying it anyway"
        );
    }

    let mut runner = ProcessRunner::new().with_progress(progress);
    if let Some(timeout) = timeout {
        runner = runner.with_timeout(timeout);
    }
    let problem = CommandProblem::new(template).with_timeout_policy(on_timeout);

    info!(
        lower = bounds[0],
        upper = bounds[1],
        tolerance = config.tolerance(),
        "starting search"
    );

    let mut session = Session::new();
    let mut evaluator = session.evaluator(&runner, &problem);
    let solution = match max_evals {
        Some(limit) => {
            golden_section::minimize(&mut evaluator, bounds, &config, EvalBudget::new(limit))
        }
        None => golden_section::minimize_unobserved(&mut evaluator, bounds, &config),
    }
    .context("search aborted")?;

    info!(
        status = ?solution.status,
        iters = solution.iters,
        evaluations = session.evaluations(),
        "search finished"
    );

    println!("{}\t{}", general(solution.x), general(solution.loss));
    Ok(())
}
