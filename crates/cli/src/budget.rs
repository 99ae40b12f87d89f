use tracing::info;

use hypersect_core::Observer;
use hypersect_solvers::optimization::golden_section::{Action, Event};

/// Stops the search once enough distinct rates have been evaluated.
#[derive(Debug, Clone, Copy)]
pub struct EvalBudget {
    limit: usize,
}

impl EvalBudget {
    /// Creates a budget of `limit` distinct evaluations.
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }
}

impl Observer<Event, Action> for EvalBudget {
    fn observe(&mut self, event: &Event) -> Option<Action> {
        if event.evaluations < self.limit {
            return None;
        }

        info!(
            evaluations = event.evaluations,
            limit = self.limit,
            "evaluation budget spent; stopping"
        );
        Some(Action::StopEarly)
    }
}
