/// A rate together with its evaluated loss.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// The search variable.
    pub x: f64,

    /// The loss at `x`.
    pub loss: f64,
}

impl Point {
    /// Creates a new point.
    #[must_use]
    pub fn new(x: f64, loss: f64) -> Self {
        Self { x, loss }
    }
}
