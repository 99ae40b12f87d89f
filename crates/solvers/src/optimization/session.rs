use std::collections::HashMap;

use thiserror::Error;
use tracing::info;

use hypersect_core::{LossProblem, Model};

use super::Point;

/// Errors that can occur when evaluating the loss at a rate.
#[derive(Debug, Error)]
pub enum EvalError<ME, PE> {
    /// The model call failed.
    #[error("model call failed")]
    Model(#[source] ME),

    /// Failed to construct input or extract the loss.
    #[error("loss evaluation failed")]
    Problem(#[source] PE),
}

/// Type alias for the result of [`Evaluator::loss`].
pub type EvalResult<M, P> =
    Result<f64, EvalError<<M as Model>::Error, <P as LossProblem>::Error>>;

/// Exact-value cache key for a rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct RateKey(u64);

impl RateKey {
    fn new(x: f64) -> Self {
        // `-0.0 == 0.0`, so both must land on the same key.
        let x = if x == 0.0 { 0.0 } else { x };
        Self(x.to_bits())
    }
}

/// Losses computed during one run, keyed by the exact rate.
///
/// Entries are never evicted or overwritten.
#[derive(Debug, Clone, Default)]
pub struct LossCache {
    entries: HashMap<RateKey, f64>,
}

impl LossCache {
    /// Returns the cached loss for `x`, if it was evaluated.
    #[must_use]
    pub fn get(&self, x: f64) -> Option<f64> {
        self.entries.get(&RateKey::new(x)).copied()
    }

    /// Returns the number of distinct rates in the cache.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been evaluated yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, x: f64, loss: f64) {
        self.entries.entry(RateKey::new(x)).or_insert(loss);
    }
}

/// The lowest loss seen so far and the rate that produced it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BestLoss {
    point: Option<Point>,
}

impl BestLoss {
    /// Returns the best loss, or `+∞` before any evaluation.
    #[must_use]
    pub fn loss(&self) -> f64 {
        self.point.map_or(f64::INFINITY, |point| point.loss)
    }

    /// Returns the best point, if any loss beat `+∞`.
    #[must_use]
    pub fn point(&self) -> Option<Point> {
        self.point
    }

    /// Records `point` if its loss is strictly lower and reports whether it was.
    fn update(&mut self, point: Point) -> bool {
        if point.loss < self.loss() {
            self.point = Some(point);
            true
        } else {
            false
        }
    }
}

/// Mutable state for one search run.
///
/// A session owns the loss cache and the best-loss tracker. Create one per run
/// and bind it to a model and problem with [`Session::evaluator`].
#[derive(Debug, Default)]
pub struct Session {
    cache: LossCache,
    best: BestLoss,
}

impl Session {
    /// Creates an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the losses computed so far.
    #[must_use]
    pub fn cache(&self) -> &LossCache {
        &self.cache
    }

    /// Returns the lowest loss seen so far.
    #[must_use]
    pub fn best(&self) -> &BestLoss {
        &self.best
    }

    /// Returns the number of distinct rates evaluated.
    #[must_use]
    pub fn evaluations(&self) -> usize {
        self.cache.len()
    }

    /// Binds this session to a model and problem.
    pub fn evaluator<'a, M, P>(&'a mut self, model: &'a M, problem: &'a P) -> Evaluator<'a, M, P> {
        Evaluator {
            model,
            problem,
            session: self,
        }
    }
}

/// A memoized loss function over a model and problem.
pub struct Evaluator<'a, M, P> {
    model: &'a M,
    problem: &'a P,
    session: &'a mut Session,
}

impl<M, P> Evaluator<'_, M, P>
where
    M: Model,
    P: LossProblem<Input = M::Input, Output = M::Output>,
{
    /// Returns the loss at `x`, calling the model only on a cache miss.
    ///
    /// A fresh loss updates the session's best loss and is cached. Failures
    /// are not cached.
    ///
    /// # Errors
    ///
    /// Returns an error if input mapping, the model call, or loss extraction fails.
    pub fn loss(&mut self, x: f64) -> EvalResult<M, P> {
        if let Some(loss) = self.session.cache.get(x) {
            return Ok(loss);
        }

        let input = self.problem.input(x).map_err(EvalError::Problem)?;
        let output = self.model.call(&input).map_err(EvalError::Model)?;
        let loss = self
            .problem
            .loss(&input, &output)
            .map_err(EvalError::Problem)?;

        let is_best = self.session.best.update(Point::new(x, loss));
        self.session.cache.insert(x, loss);

        if is_best {
            info!(rate = x, loss, "evaluated (best)");
        } else {
            info!(rate = x, loss, "evaluated");
        }

        Ok(loss)
    }

    /// Returns the session backing this evaluator.
    #[must_use]
    pub fn session(&self) -> &Session {
        &*self.session
    }
}
