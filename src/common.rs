//! Defines some common functions used in this library.

/// Defines statistical helpers such as the G-statistic
/// and the chi-square p-value.
pub mod stat_util;

/// Defines the newtypes shared across the tree modules.
pub mod type_and_struct;

/// Defines the cancellation token checked during long computations.
pub mod interrupt;

/// Defines some checker functions.
pub(crate) mod checker;

pub use interrupt::Interrupt;
pub use type_and_struct::{SubgraphId, Depth};
