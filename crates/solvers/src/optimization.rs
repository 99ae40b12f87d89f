//! Solvers for optimization problems: minimizing a loss over one variable.
//!
//! A [`LossProblem`] maps the search variable to model input, the model is
//! called, and the problem extracts a scalar loss. The [`Session`] caches those
//! losses and tracks the best one seen, and solvers in this module query it
//! through an [`Evaluator`].
//!
//! # Solvers
//!
//! - [`golden_section`]: derivative-free search over a bounded interval for
//!   unimodal losses
//!
//! [`LossProblem`]: hypersect_core::LossProblem

mod argmin;
mod point;
mod session;

pub use argmin::argmin3;
pub use point::Point;
pub use session::{BestLoss, EvalError, EvalResult, Evaluator, LossCache, Session};

pub mod golden_section;
