#![warn(missing_docs)]

//!
//! A crate that provides Relational Probability Trees (RPTs).
//!
//! An RPT is a binary probability estimation tree over *subgraphs*.
//! Every internal node tests one feature setting,
//! an aggregated binary attribute of a subgraph,
//! and every leaf holds a distribution of the class label.
//!
//! - Learning
//!     Splits are chosen greedily by a pluggable statistic
//!     (G-statistic, Gini, information gain, RMSE,
//!     or a permutation test of any of them)
//!     and accepted only when significant.
//!     Subgraphs with a missing value are sent down both branches
//!     with fractional weight.
//!
//! - Pruning
//!     Cost-complexity (weakest-link) pruning produces a sequence
//!     of nested trees; one of them is selected
//!     by a held-out container or by cross validation.
//!
//! # Example
//! ```no_run
//! use rptree::prelude::*;
//!
//! let labels = AttributeLabels::discrete(
//!     "label", [(1, "+"), (2, "-"), (3, "-")]
//! );
//! let mut catalog = MatchTableCatalog::new();
//! catalog.insert_matches(
//!     FeatureSetting::new("neighbor.color", "count", 1),
//!     [(1, true), (2, false), (3, false)],
//! );
//!
//! let container = labels.container("train");
//! let mut rpt = RptBuilder::new()
//!     .pruning(PruningKind::CrossValidation { n_folds: 3, shuffle: false })
//!     .build()
//!     .unwrap();
//! rpt.learn(&container, &labels, &catalog).unwrap();
//! println!("{rpt:#}");
//! ```

pub mod common;
pub mod error;
pub mod sample;
pub mod distribution;
pub mod predictions;
pub mod rpt;
pub mod research;
pub mod prelude;


pub use error::{RptError, Result};
pub use common::{Interrupt, SubgraphId};
pub use sample::{
    Container,
    WeightedInstanceSet,
    LabelTable,
    LabelValue,
    MatchTable,
    FeatureSetting,
    LabelSource,
    FeatureCatalog,
    AttributeLabels,
    MatchTableCatalog,
};
pub use distribution::{
    ProbDistribution,
    DiscreteDistribution,
    ContinuousDistribution,
};
pub use predictions::Predictions;
pub use rpt::{
    Rpt,
    RptBuilder,
    RptConfig,
    RptNode,
    PruningNode,
    TreeBuilder,
};
pub use research::{CrossValidation, Fold};
