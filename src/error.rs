//! The crate-wide error type.
use std::path::PathBuf;

/// Errors from learning, applying, pruning, or persisting an RPT.
#[derive(Debug, thiserror::Error)]
pub enum RptError {
    /// Returned when an operation needs a learned tree but none exists.
    #[error("you must call learn before using {operation}")]
    Untrained {
        /// The operation that was attempted.
        operation: &'static str,
    },

    /// Returned when two scores of different kinds are compared.
    #[error("cannot compare score of different types: expected {expected}, found {found}")]
    ScoreMismatch {
        /// Kind of the receiving score.
        expected: &'static str,
        /// Kind of the other score.
        found: &'static str,
    },

    /// Returned when a discrete and a continuous distribution are combined.
    #[error("cannot merge distributions of different kinds")]
    DistributionMismatch,

    /// Returned when an operation does not support the label kind.
    #[error("{operation} is not defined for {} labels", if *continuous { "continuous" } else { "discrete" })]
    UnsupportedLabel {
        /// The operation that was attempted.
        operation: &'static str,
        /// Whether the offending label is continuous.
        continuous: bool,
    },

    /// Returned when a feature setting has no match table in the cache.
    #[error("no match table cached for feature setting `{signature}`")]
    MissingMatchTable {
        /// Canonical signature of the feature setting.
        signature: String,
    },

    /// Returned when a selector is handed an empty pruning sequence.
    #[error("pruning sequence is empty")]
    EmptyPruningSequence,

    /// Returned when learning starts without any labeled subgraph.
    #[error("container `{container}` has no labeled subgraphs")]
    EmptyInstanceSet {
        /// Name of the training container.
        container: String,
    },

    /// Returned when an expansion does not point at a leaf of the tree.
    #[error("expansion path {path:?} does not end at a leaf")]
    StaleExpansion {
        /// Branch choices from the root, `true` for the yes branch.
        path: Vec<bool>,
    },

    /// Returned when a p-value cutoff is outside `(0, 1]`.
    #[error("p-value cutoff must be in (0.0, 1.0], got {cutoff}")]
    InvalidCutoff {
        /// The invalid cutoff.
        cutoff: f64,
    },

    /// Returned when a permutation count is zero.
    #[error("number of pseudo-samples must be at least 1, got {n_samples}")]
    InvalidSampleCount {
        /// The invalid count.
        n_samples: usize,
    },

    /// Returned when the number of cross-validation folds is zero.
    #[error("n_folds must be at least 1, got {n_folds}")]
    InvalidFoldCount {
        /// The invalid fold count.
        n_folds: usize,
    },

    /// Returned when the minimum instance count is negative or not finite.
    #[error("min_instances must be a finite non-negative weight, got {min_instances}")]
    InvalidMinInstances {
        /// The invalid minimum.
        min_instances: f64,
    },

    /// Returned when the randomization threshold is outside `[0, 1]`.
    #[error("randomization threshold must be in [0.0, 1.0], got {threshold}")]
    InvalidThreshold {
        /// The invalid threshold.
        threshold: f64,
    },

    /// Returned when the caller cancelled the computation.
    #[error("computation cancelled")]
    Cancelled,

    /// Returned when the configured deadline has passed.
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// Returned when a label source or feature catalog fails.
    #[error("source `{source_name}` failed: {message}")]
    Source {
        /// Name of the failing source.
        source_name: String,
        /// Human-readable description of the failure.
        message: String,
    },

    /// Returned when converting a `polars` frame fails.
    #[error("failed to read data frame")]
    DataFrame(#[from] polars::prelude::PolarsError),

    /// Returned when model serialization fails.
    #[error("failed to serialize model")]
    SerializeModel {
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// Returned when model deserialization fails.
    #[error("failed to deserialize model from {path}")]
    DeserializeModel {
        /// Path to the model file.
        path: PathBuf,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// Returned when writing the model file fails.
    #[error("failed to write model to {path}")]
    WriteModel {
        /// Path to the model file.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when reading the model file fails.
    #[error("failed to read model from {path}")]
    ReadModel {
        /// Path to the model file.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when the model file was written by an incompatible format.
    #[error("incompatible model version in {path}: expected {expected}, found {found}")]
    IncompatibleModelVersion {
        /// The format version this build expects.
        expected: u32,
        /// The format version found in the file.
        found: u32,
        /// Path to the model file.
        path: PathBuf,
    },
}


/// Shorthand for results carrying an [`RptError`].
pub type Result<T> = std::result::Result<T, RptError>;
