//! Core traits for black-box hyperparameter search.
//!
//! This crate defines the seams the rest of the workspace plugs into:
//!
//! - [`Model`]: an expensive callable, such as an external command, that maps
//!   a typed input to a typed output
//! - [`Observer`]: receives solver events and optionally returns control actions
//! - [`LossProblem`]: turns a scalar search variable into model input and
//!   extracts a loss from what the model produced

mod model;
mod observer;
mod problem;

pub use model::Model;
pub use observer::Observer;
pub use problem::LossProblem;
