//! Post-pruning of a learned tree.
//!
//! A [`PruningModule`] maps a learned tree to the tree the model keeps.
//! [`CostComplexityPruning`] builds the weakest-link sequence of the tree
//! and hands it to a [`TreeSelectionModule`] that picks one member.

/// Cost-complexity (weakest-link) pruning.
pub(crate) mod cost_complexity;
/// Selection by loss on a held-out container.
pub(crate) mod test_sample;
/// Selection by cross-validated loss.
pub(crate) mod cross_validation;

pub use cost_complexity::{CostComplexityPruning, minimal_subtree, pruning_sequence};
pub use test_sample::TestSampleSelection;
pub use cross_validation::CrossValidationSelection;


use crate::common::Interrupt;
use crate::error::{RptError, Result};
use crate::sample::{Container, FeatureCatalog, LabelSource};
use super::learning::TreeBuilder;
use super::node::{PruningNode, RptNode};


/// Everything a pruning or selection module may need
/// besides the tree itself.
pub struct PruneContext<'a> {
    pub(crate) container: &'a Container,
    pub(crate) label_source: &'a dyn LabelSource,
    pub(crate) catalog: &'a dyn FeatureCatalog,
    pub(crate) builder: &'a TreeBuilder,
    pub(crate) seed: u64,
    pub(crate) interrupt: Interrupt,
}


impl<'a> PruneContext<'a> {
    /// Construct a new context.
    /// `container` is the training container of the pruned tree.
    pub fn new(
        container: &'a Container,
        label_source: &'a dyn LabelSource,
        catalog: &'a dyn FeatureCatalog,
        builder: &'a TreeBuilder,
        seed: u64,
        interrupt: Interrupt,
    ) -> Self
    {
        Self { container, label_source, catalog, builder, seed, interrupt, }
    }


    /// Returns the training container.
    #[inline]
    pub fn container(&self) -> &Container {
        self.container
    }
}


/// Maps a learned tree to the tree kept by the model.
pub trait PruningModule: Send + Sync {
    /// Returns the name of this module.
    fn name(&self) -> &str;


    /// Returns the pruned tree.
    /// `root` itself is never modified.
    fn prune(&self, root: &RptNode, ctx: &PruneContext<'_>) -> Result<RptNode>;
}


/// Picks one tree of a pruning sequence.
pub trait TreeSelectionModule: Send + Sync {
    /// Returns the name of this module.
    fn name(&self) -> &str;


    /// Returns the selected tree.
    fn select(&self, sequence: &[PruningNode], ctx: &PruneContext<'_>)
        -> Result<RptNode>;
}


/// Keeps the learned tree as is.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPruning;


impl PruningModule for NoPruning {
    fn name(&self) -> &str {
        "NoPruning"
    }


    fn prune(&self, root: &RptNode, _ctx: &PruneContext<'_>) -> Result<RptNode> {
        Ok(root.clone())
    }
}


/// Returns the index of the tree with the minimum score.
/// Ties go to the tree with fewer leaves.
pub(crate) fn best_index(sequence: &[PruningNode], scores: &[f64])
    -> Result<usize>
{
    if sequence.is_empty() { return Err(RptError::EmptyPruningSequence); }

    let mut best = 0usize;
    for (i, (tree, &score)) in sequence.iter().zip(scores).enumerate().skip(1) {
        let best_score = scores[best];
        let fewer = tree.leaf_count() < sequence[best].leaf_count();
        if score < best_score || (score == best_score && fewer) {
            best = i;
        }
    }
    Ok(best)
}
