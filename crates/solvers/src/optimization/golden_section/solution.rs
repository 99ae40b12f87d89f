/// How the search finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The interval shrank below the relative tolerance.
    Converged,

    /// The probe and the interior point had exactly equal losses.
    Tied,

    /// Reached the step limit without converging.
    MaxIters,

    /// Stopped early due to an observer decision.
    StoppedByObserver,
}

/// The result of a golden section search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    /// Final solver status.
    pub status: Status,

    /// Best estimate of the optimal rate.
    pub x: f64,

    /// Loss at the reported rate.
    pub loss: f64,

    /// Number of completed search steps.
    pub iters: usize,
}
