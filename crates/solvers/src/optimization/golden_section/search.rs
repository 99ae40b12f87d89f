use tracing::{debug, warn};

use hypersect_core::{LossProblem, Model, Observer};

use crate::optimization::{Evaluator, Point};

use super::{Action, Config, Error, Event, Interval, Solution, Status};

/// Core golden section search loop.
pub(super) fn search<M, P, Obs>(
    evaluator: &mut Evaluator<'_, M, P>,
    bounds: [f64; 2],
    config: &Config,
    mut observer: Obs,
) -> Result<Solution, Error>
where
    M: Model,
    P: LossProblem<Input = M::Input, Output = M::Output>,
    Obs: Observer<Event, Action>,
{
    let mut interval = Interval::new(bounds);

    for iter in 0..config.max_iters() {
        let x = interval.candidate();
        if interval.is_converged(x, config.tolerance()) {
            return finish(evaluator, interval.center(), Status::Converged, iter);
        }

        let candidate = Point::new(x, evaluator.loss(x)?);
        let mid = Point::new(interval.mid, evaluator.loss(interval.mid)?);
        debug!(
            low = interval.low,
            mid = interval.mid,
            high = interval.high,
            x,
            "compared probe against interior point"
        );

        let event = Event {
            iter: iter + 1,
            interval,
            candidate,
            mid,
            evaluations: evaluator.session().evaluations(),
        };
        if let Some(Action::StopEarly) = observer.observe(&event) {
            return finish(evaluator, event.best().x, Status::StoppedByObserver, iter + 1);
        }

        if candidate.loss == mid.loss {
            warn!(
                x,
                mid = mid.x,
                loss = mid.loss,
                "probe and interior point have equal loss; stopping with their average"
            );
            return finish(evaluator, 0.5 * (x + mid.x), Status::Tied, iter + 1);
        }

        interval = if candidate.loss < mid.loss {
            interval.toward(x)
        } else {
            interval.away_from(x)
        };
    }

    finish(
        evaluator,
        interval.center(),
        Status::MaxIters,
        config.max_iters(),
    )
}

/// Evaluates the loss at the reported rate and builds the solution.
fn finish<M, P>(
    evaluator: &mut Evaluator<'_, M, P>,
    x: f64,
    status: Status,
    iters: usize,
) -> Result<Solution, Error>
where
    M: Model,
    P: LossProblem<Input = M::Input, Output = M::Output>,
{
    let loss = evaluator.loss(x)?;
    Ok(Solution {
        status,
        x,
        loss,
        iters,
    })
}
