//! Tools for evaluating trees:
//! generation of training/test folds over a container.

/// Provides the fold generator.
pub mod cross_validation;

pub use cross_validation::{CrossValidation, Fold};
