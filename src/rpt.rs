//! The Relational Probability Tree:
//! induction, inference, pruning, and persistence.

// Provides the tree nodes.
pub(crate) mod node;
// Provides the match-table cache and the recursion state.
pub(crate) mod state;
// Provides the missing-value aware partition of instances.
pub mod branching;
// Provides the split statistics.
pub mod scoring;
// Provides the choice of the best split.
pub(crate) mod splitting;
// Provides the stopping rules.
pub(crate) mod stopping;
// Provides the acceptance tests of a chosen split.
pub(crate) mod significance;
// Provides the recursive tree builder.
pub(crate) mod learning;
// Provides the tree applier.
pub(crate) mod applier;
// Provides the pruning and tree-selection modules.
pub mod pruning;
// Provides the builder and the declarative configuration.
pub(crate) mod builder;
// Provides the model.
pub(crate) mod model;
// Provides JSON persistence of a model.
pub(crate) mod persist;


pub use node::{RptNode, BranchNode, LeafNode, PruningNode};
pub use state::{TableCache, CandidatePool, ScoreContext, RecursionState};
pub use scoring::{
    ScoringModule,
    Score,
    ChiSquareScore,
    GiniScore,
    QuinlanInfoScore,
    RmseScore,
    RandomizationPValueScore,
};
pub use splitting::{SplittingModule, DefaultSplittingModule, Split};
pub use stopping::{StoppingModule, DefaultStoppingModule};
pub use significance::{
    SignificanceModule,
    DefaultSignificanceModule,
    RandomizationSignificanceModule,
};
pub use learning::{TreeBuilder, Expansion};
pub use applier::{apply_tree, apply_weighted};
pub use pruning::{
    PruningModule,
    TreeSelectionModule,
    PruneContext,
    NoPruning,
    CostComplexityPruning,
    TestSampleSelection,
    CrossValidationSelection,
};
pub use builder::{
    RptBuilder,
    RptConfig,
    ScoringKind,
    PruningKind,
    RandomizationSettings,
};
pub use model::Rpt;
