use tracing::debug;

use crate::error::Result;
use crate::rpt::applier::apply_tree;
use crate::rpt::node::{PruningNode, RptNode};
use crate::rpt::state::TableCache;
use crate::sample::Container;
use super::{best_index, PruneContext, TreeSelectionModule};


/// Picks the tree with the least zero-one loss on a held-out container.
/// Ties go to the tree with fewer leaves.
#[derive(Debug, Clone)]
pub struct TestSampleSelection {
    test: Container,
}


impl TestSampleSelection {
    /// Construct a selector that scores trees on `test`.
    #[inline]
    pub fn new(test: Container) -> Self {
        Self { test }
    }


    /// Returns the held-out container.
    #[inline]
    pub fn test(&self) -> &Container {
        &self.test
    }


    /// Returns the zero-one loss of every tree of `sequence`.
    pub fn score_sequence(
        &self,
        sequence: &[PruningNode],
        ctx: &PruneContext<'_>,
    ) -> Result<Vec<f64>>
    {
        let labels = ctx.label_source.label_table(&self.test)?;
        let cache = TableCache::new(self.test.clone(), ctx.catalog);

        sequence.iter()
            .map(|tree| -> Result<f64> {
                let mut predictions = apply_tree(&tree.root, &cache, &ctx.interrupt)?;
                predictions.set_true_labels(&labels);
                let loss = predictions.zero_one_loss()?;
                debug!(alpha = tree.alpha, n_leaves = tree.leaf_count(), loss, "tree scored");
                Ok(loss)
            })
            .collect()
    }
}


impl TreeSelectionModule for TestSampleSelection {
    fn name(&self) -> &str {
        "TestSampleSelection"
    }


    fn select(&self, sequence: &[PruningNode], ctx: &PruneContext<'_>)
        -> Result<RptNode>
    {
        let scores = self.score_sequence(sequence, ctx)?;
        let best = best_index(sequence, &scores)?;
        Ok(sequence[best].root.clone())
    }
}
