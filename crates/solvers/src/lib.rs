//! Solvers for expensive single-variable loss minimization.
//!
//! The search runs against an [`optimization::Evaluator`], which memoizes
//! every loss it computes in a per-run [`optimization::Session`]. Each distinct
//! rate therefore reaches the underlying model at most once.

pub mod optimization;
