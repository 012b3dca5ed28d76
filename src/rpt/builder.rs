use serde::{Serialize, Deserialize};

use std::sync::Arc;

use crate::common::{checker, Interrupt};
use crate::error::Result;
use crate::sample::Container;
use super::learning::TreeBuilder;
use super::model::Rpt;
use super::pruning::{
    CostComplexityPruning,
    CrossValidationSelection,
    NoPruning,
    PruningModule,
    TestSampleSelection,
};
use super::scoring::{
    ChiSquareScore,
    GiniScore,
    QuinlanInfoScore,
    RandomizationPValueScore,
    RmseScore,
    ScoringModule,
};
use super::significance::{
    DefaultSignificanceModule,
    RandomizationSignificanceModule,
    SignificanceModule,
    DEFAULT_MAX_SAMPLES,
    DEFAULT_P_VALUE,
    DEFAULT_THRESHOLD,
};
use super::splitting::DefaultSplittingModule;
use super::stopping::{DefaultStoppingModule, DEFAULT_MIN_INSTANCES};


/// The seed set as default.
pub const DEFAULT_SEED: u64 = 1234;


/// The statistic that ranks candidate splits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringKind {
    /// [`RmseScore`] for a continuous label, [`ChiSquareScore`] otherwise.
    #[default]
    Auto,
    /// See [`ChiSquareScore`].
    ChiSquare,
    /// See [`GiniScore`].
    Gini,
    /// See [`QuinlanInfoScore`].
    QuinlanInfo,
    /// See [`RmseScore`].
    Rmse,
}


/// How the learned tree is pruned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PruningKind {
    /// Keep the learned tree.
    #[default]
    None,
    /// Cost-complexity pruning, selected on a held-out container.
    TestSample {
        /// The held-out container.
        container: Container,
    },
    /// Cost-complexity pruning, selected by cross validation.
    CrossValidation {
        /// Number of folds.
        n_folds: usize,
        /// Shuffle the training container before generating folds.
        shuffle: bool,
    },
}


/// Parameters of the label-permutation significance test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RandomizationSettings {
    /// Number of permutations.
    pub max_samples: usize,
    /// Share of permutations the chosen split must beat.
    pub threshold: f64,
}


impl Default for RandomizationSettings {
    fn default() -> Self {
        Self { max_samples: DEFAULT_MAX_SAMPLES, threshold: DEFAULT_THRESHOLD, }
    }
}


/// Declarative description of an [`Rpt`],
/// suitable for loading from JSON.
///
/// # Example
/// ```no_run
/// use rptree::prelude::*;
///
/// let json = r#"{ "scoring": "chi_square", "p_value": 0.01 }"#;
/// let config: RptConfig = serde_json::from_str(json).unwrap();
/// let rpt = RptBuilder::from_config(config).build().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RptConfig {
    /// The split statistic.
    pub scoring: ScoringKind,
    /// If set, the split statistic is wrapped in a permutation test
    /// with this many permutations.
    pub randomization_samples: Option<usize>,
    /// Scan candidates in signature order instead of a seeded shuffle.
    pub deterministic: bool,
    /// Minimum total weight of a node that may be split.
    pub min_instances: f64,
    /// Maximal depth of the tree.
    pub max_depth: Option<usize>,
    /// Stop at nodes with a single label value.
    pub stop_when_pure: bool,
    /// The significance cutoff of a split.
    pub p_value: f64,
    /// If set, splits must also pass a label-permutation test.
    pub randomization_significance: Option<RandomizationSettings>,
    /// The pruning strategy.
    pub pruning: PruningKind,
    /// The seed of every random choice.
    pub seed: u64,
}


impl Default for RptConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringKind::Auto,
            randomization_samples: None,
            deterministic: false,
            min_instances: DEFAULT_MIN_INSTANCES,
            max_depth: None,
            stop_when_pure: false,
            p_value: DEFAULT_P_VALUE,
            randomization_significance: None,
            pruning: PruningKind::None,
            seed: DEFAULT_SEED,
        }
    }
}


impl RptConfig {
    /// Check every parameter.
    pub fn validate(&self) -> Result<()> {
        checker::check_cutoff(self.p_value)?;
        checker::check_min_instances(self.min_instances)?;
        if let Some(n) = self.randomization_samples {
            checker::check_n_samples(n)?;
        }
        if let Some(r) = self.randomization_significance {
            checker::check_n_samples(r.max_samples)?;
            checker::check_threshold(r.threshold)?;
        }
        if let PruningKind::CrossValidation { n_folds, .. } = self.pruning {
            checker::check_n_folds(n_folds)?;
        }
        Ok(())
    }


    /// Returns the tree builder described by this configuration
    /// for a label of the given kind.
    pub(crate) fn tree_builder(&self, continuous: bool) -> Result<TreeBuilder> {
        let base: Arc<dyn ScoringModule> = match self.scoring {
            ScoringKind::Auto if continuous => Arc::new(RmseScore::new()),
            ScoringKind::Auto => Arc::new(ChiSquareScore::new()),
            ScoringKind::ChiSquare => Arc::new(ChiSquareScore::new()),
            ScoringKind::Gini => Arc::new(GiniScore::new()),
            ScoringKind::QuinlanInfo => Arc::new(QuinlanInfoScore::new()),
            ScoringKind::Rmse => Arc::new(RmseScore::new()),
        };
        let scoring: Arc<dyn ScoringModule> = match self.randomization_samples {
            Some(n) => Arc::new(
                RandomizationPValueScore::from_shared(base).n_samples(n)?
            ),
            None => base,
        };

        let splitting = DefaultSplittingModule::new()
            .deterministic(self.deterministic);
        let stopping = DefaultStoppingModule::new()
            .min_instances(self.min_instances)?
            .max_depth(self.max_depth)
            .stop_when_pure(self.stop_when_pure);
        let significance: Arc<dyn SignificanceModule> =
            match self.randomization_significance {
                Some(r) => Arc::new(
                    RandomizationSignificanceModule::new()
                        .p_value(self.p_value)?
                        .max_samples(r.max_samples)?
                        .threshold(r.threshold)?
                ),
                None => Arc::new(DefaultSignificanceModule::new(self.p_value)?),
            };

        Ok(TreeBuilder::new(
            scoring, Arc::new(splitting), Arc::new(stopping), significance,
        ))
    }


    /// Returns the pruning module described by this configuration.
    pub(crate) fn pruning_module(&self) -> Result<Arc<dyn PruningModule>> {
        let module: Arc<dyn PruningModule> = match &self.pruning {
            PruningKind::None => Arc::new(NoPruning),
            PruningKind::TestSample { container } => {
                let selection = TestSampleSelection::new(container.clone());
                Arc::new(CostComplexityPruning::new(selection))
            },
            PruningKind::CrossValidation { n_folds, shuffle } => {
                let selection = CrossValidationSelection::new(*n_folds)?
                    .shuffle(*shuffle);
                Arc::new(CostComplexityPruning::new(selection))
            },
        };
        Ok(module)
    }
}


/// A struct that builds [`Rpt`].
/// `RptBuilder` keeps parameters for constructing `Rpt`.
///
/// # Example
///
/// ```no_run
/// use rptree::prelude::*;
///
/// let rpt = RptBuilder::new()
///     .scoring(ScoringKind::ChiSquare)
///     .p_value(0.01)
///     .min_instances(5.0)
///     .max_depth(4)
///     .pruning(PruningKind::CrossValidation { n_folds: 5, shuffle: true })
///     .seed(777)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone, Default)]
pub struct RptBuilder {
    config: RptConfig,
    interrupt: Interrupt,
    tree_builder: Option<TreeBuilder>,
    pruning: Option<Arc<dyn PruningModule>>,
}


impl RptBuilder {
    /// Construct a new instance of [`RptBuilder`].
    /// By default, [`RptBuilder`] sets the parameters as follows;
    /// ```text
    /// scoring: ScoringKind::Auto,
    /// deterministic: false,
    /// min_instances: DEFAULT_MIN_INSTANCES == 2.0,
    /// max_depth: None,
    /// stop_when_pure: false,
    /// p_value: DEFAULT_P_VALUE == 0.05,
    /// pruning: PruningKind::None,
    /// seed: DEFAULT_SEED == 1234,
    /// ```
    pub fn new() -> Self {
        Self::default()
    }


    /// Construct a builder from a declarative configuration.
    pub fn from_config(config: RptConfig) -> Self {
        Self { config, ..Self::default() }
    }


    /// Set the split statistic.
    /// Default value is `ScoringKind::Auto`.
    #[inline]
    pub fn scoring(mut self, scoring: ScoringKind) -> Self {
        self.config.scoring = scoring;
        self
    }


    /// Wrap the split statistic in a permutation test
    /// with `n_samples` permutations.
    #[inline]
    pub fn randomized_scoring(mut self, n_samples: usize) -> Self {
        self.config.randomization_samples = Some(n_samples);
        self
    }


    /// Scan candidates in signature order instead of a seeded shuffle.
    /// Default value is `false`.
    #[inline]
    pub fn deterministic(mut self, deterministic: bool) -> Self {
        self.config.deterministic = deterministic;
        self
    }


    /// Set the minimum total weight of a node that may be split.
    /// Default value is `2.0`.
    #[inline]
    pub fn min_instances(mut self, min_instances: f64) -> Self {
        self.config.min_instances = min_instances;
        self
    }


    /// Specify the maximal depth of the tree.
    /// By default, the depth is unbounded.
    #[inline]
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.config.max_depth = Some(depth);
        self
    }


    /// Stop at nodes with a single label value.
    /// Default value is `false`.
    #[inline]
    pub fn stop_when_pure(mut self, stop_when_pure: bool) -> Self {
        self.config.stop_when_pure = stop_when_pure;
        self
    }


    /// Set the significance cutoff of a split.
    /// Default value is `0.05`.
    #[inline]
    pub fn p_value(mut self, p_value: f64) -> Self {
        self.config.p_value = p_value;
        self
    }


    /// Require every split to pass a label-permutation test.
    #[inline]
    pub fn randomization_significance(mut self, max_samples: usize, threshold: f64)
        -> Self
    {
        let settings = RandomizationSettings { max_samples, threshold };
        self.config.randomization_significance = Some(settings);
        self
    }


    /// Set the pruning strategy.
    /// Default value is `PruningKind::None`.
    #[inline]
    pub fn pruning(mut self, pruning: PruningKind) -> Self {
        self.config.pruning = pruning;
        self
    }


    /// Set the seed of every random choice.
    /// Default value is `1234`.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }


    /// Set the cancellation token checked while learning and pruning.
    #[inline]
    pub fn interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = interrupt;
        self
    }


    /// Use custom learning modules.
    /// This overrides every scoring, splitting, stopping,
    /// and significance parameter.
    #[inline]
    pub fn tree_builder(mut self, tree_builder: TreeBuilder) -> Self {
        self.tree_builder = Some(tree_builder);
        self
    }


    /// Use a custom pruning module.
    /// This overrides [`RptBuilder::pruning`].
    #[inline]
    pub fn pruning_module<P>(mut self, pruning: P) -> Self
        where P: PruningModule + 'static
    {
        self.pruning = Some(Arc::new(pruning));
        self
    }


    /// Build an untrained [`Rpt`].
    /// This method consumes `self`.
    pub fn build(self) -> Result<Rpt> {
        self.config.validate()?;
        let pruning = match self.pruning {
            Some(pruning) => pruning,
            None => self.config.pruning_module()?,
        };
        Ok(Rpt::from_components(
            self.config, self.interrupt, self.tree_builder, pruning,
        ))
    }
}
