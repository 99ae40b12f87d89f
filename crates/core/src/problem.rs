/// Defines a single-variable loss minimization problem.
///
/// A loss problem maps the search variable (for example a learning rate) into
/// a model input, then extracts the scalar loss from the model input and
/// output. Solvers search for the variable that minimizes the loss.
pub trait LossProblem {
    type Input;
    type Output;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Maps the search variable `x` into a model input.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the input cannot be constructed from `x`.
    fn input(&self, x: f64) -> Result<Self::Input, Self::Error>;

    /// Extracts the loss from model input/output.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the output does not carry a usable loss.
    fn loss(&self, input: &Self::Input, output: &Self::Output) -> Result<f64, Self::Error>;
}
