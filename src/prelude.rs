//! Exports the model, its builder, the modules, and the data tables.
//!
pub use crate::rpt::{
    // Model -------------------------------------
    Rpt,
    RptBuilder,
    RptConfig,
    ScoringKind,
    PruningKind,
    RandomizationSettings,


    // Tree --------------------------------------
    RptNode,
    PruningNode,
    TreeBuilder,
    TableCache,


    // Modules -----------------------------------
    ScoringModule,
    ChiSquareScore,
    GiniScore,
    QuinlanInfoScore,
    RmseScore,
    RandomizationPValueScore,

    SplittingModule,
    DefaultSplittingModule,

    StoppingModule,
    DefaultStoppingModule,

    SignificanceModule,
    DefaultSignificanceModule,
    RandomizationSignificanceModule,

    PruningModule,
    TreeSelectionModule,
    NoPruning,
    CostComplexityPruning,
    TestSampleSelection,
    CrossValidationSelection,
};


pub use crate::sample::{
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


pub use crate::distribution::ProbDistribution;
pub use crate::predictions::Predictions;
pub use crate::common::{Interrupt, SubgraphId};
pub use crate::error::RptError;
