//! Golden section search for single-variable loss minimization.
//!
//! # Algorithm
//!
//! The search keeps an interval `[low, high]` with one evaluated interior
//! point `mid`. Each step probes a new point `x` a fraction `ρ = 2 − φ` into
//! the larger of the two subintervals, compares `loss(x)` against
//! `loss(mid)`, and discards the part of the interval that cannot hold the
//! minimum. The retained interior point keeps the golden proportion, so every
//! step after the first costs a single new evaluation.
//!
//! The search stops when `|high − low| < tolerance · (|mid| + |x|)`, which
//! makes the tolerance relative to the magnitude of the rates being compared,
//! and answers the center of the final interval.
//!
//! If `loss(x)` and `loss(mid)` are exactly equal the search cannot tell which
//! side to keep. It logs a warning and answers `(x + mid) / 2`.
//!
//! # When to Use
//!
//! - The loss is unimodal on the interval
//! - Each evaluation is expensive, so reusing points matters more than
//!   convergence order
//! - Derivatives are unavailable, for example when the loss comes from an
//!   external training run
//!
//! # Observer Events
//!
//! The solver emits one [`Event`] per step, after both `x` and `mid` have been
//! evaluated. Observers can return [`Action::StopEarly`] to halt immediately.
//!
//! Every path ends with one more [`Evaluator::loss`] call at the reported rate
//! (usually a cache hit) so the [`Solution`] always carries the loss at `x`.

mod action;
mod config;
mod error;
mod event;
mod interval;
mod search;
mod solution;


pub use action::Action;
pub use config::{Config, ConfigError, DEFAULT_MAX_ITERS, DEFAULT_TOLERANCE};
pub use error::Error;
pub use event::Event;
pub use interval::Interval;
pub use solution::{Solution, Status};

use hypersect_core::{LossProblem, Model, Observer};

use super::Evaluator;

use search::search;

/// Finds the rate that minimizes the loss using golden section search.
///
/// The observer receives an [`Event`] for each step.
/// See the [module docs](self) for details on termination and events.
///
/// # Errors
///
/// Returns an error if the model or problem fails during any evaluation.
/// No evaluation is retried.
pub fn minimize<M, P, Obs>(
    evaluator: &mut Evaluator<'_, M, P>,
    bounds: [f64; 2],
    config: &Config,
    observer: Obs,
) -> Result<Solution, Error>
where
    M: Model,
    P: LossProblem<Input = M::Input, Output = M::Output>,
    Obs: Observer<Event, Action>,
{
    search(evaluator, bounds, config, observer)
}

/// Finds the rate that minimizes the loss without observer support.
///
/// This is a convenience wrapper around [`minimize`] that uses a no-op observer.
///
/// # Errors
///
/// Returns an error if the model or problem fails during any evaluation.
pub fn minimize_unobserved<M, P>(
    evaluator: &mut Evaluator<'_, M, P>,
    bounds: [f64; 2],
    config: &Config,
) -> Result<Solution, Error>
where
    M: Model,
    P: LossProblem<Input = M::Input, Output = M::Output>,
{
    minimize(evaluator, bounds, config, ())
}
