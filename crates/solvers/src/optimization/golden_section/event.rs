use crate::optimization::Point;

use super::Interval;

/// Emitted once per search step, after both points have been evaluated.
///
/// `candidate` is the new probe and `mid` the interior point it was compared
/// against. Observers can inspect them and return [`Action::StopEarly`].
///
/// [`Action::StopEarly`]: super::Action::StopEarly
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    /// One-based step number.
    pub iter: usize,

    /// The interval the step started from.
    pub interval: Interval,

    /// The newly probed point.
    pub candidate: Point,

    /// The interior point of `interval`.
    pub mid: Point,

    /// Distinct rates evaluated so far in the session.
    pub evaluations: usize,
}

impl Event {
    /// Returns the better of `candidate` and `mid`, preferring `mid` on ties.
    #[must_use]
    pub fn best(&self) -> Point {
        if self.candidate.loss < self.mid.loss {
            self.candidate
        } else {
            self.mid
        }
    }
}
