/// A callable model that maps an input to an output.
///
/// Calls are assumed to be expensive. Solvers should never call a model twice
/// for the same input when a cached result is available.
pub trait Model {
    type Input;
    type Output;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Calls the model with the given input.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the call cannot produce an output at all.
    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error>;
}
