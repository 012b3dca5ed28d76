use rand::prelude::*;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::common::checker;
use crate::error::{RptError, Result};
use crate::predictions::Predictions;
use crate::research::{CrossValidation, Fold};
use crate::rpt::applier::apply_tree;
use crate::rpt::node::{PruningNode, RptNode};
use crate::rpt::state::{ScoreContext, TableCache};
use crate::sample::LabelTable;
use super::{best_index, PruneContext, TreeSelectionModule};
use super::cost_complexity::pruning_sequence;


/// The number of folds set as default.
pub const DEFAULT_N_FOLDS: usize = 10;


/// Picks the tree with the least cross-validated zero-one loss.
///
/// A fresh tree is learned on the training part of every fold
/// (folds are learned in parallel) and reduced to its own
/// pruning sequence.
/// A tree `T_i` of the main sequence is scored at the alpha
/// `sqrt(alpha_i * alpha_{i+1})`: every fold contributes its first tree
/// whose alpha reaches it (or its last tree if none does),
/// applied to the fold's test part.
/// The single-leaf tree is scored by its resubstitution error.
/// Ties go to the tree with fewer leaves.
///
/// # Example
/// ```no_run
/// use rptree::prelude::*;
///
/// let selection = CrossValidationSelection::new(5)
///     .unwrap()
///     .shuffle(true);
/// let pruning = CostComplexityPruning::new(selection);
/// ```
#[derive(Debug, Clone)]
pub struct CrossValidationSelection {
    n_folds: usize,
    shuffle: bool,
    seed: Option<u64>,
    folds: Option<Vec<Fold>>,
}


impl Default for CrossValidationSelection {
    fn default() -> Self {
        Self { n_folds: DEFAULT_N_FOLDS, shuffle: false, seed: None, folds: None, }
    }
}


impl CrossValidationSelection {
    /// Construct a selector over `n_folds` generated folds.
    pub fn new(n_folds: usize) -> Result<Self> {
        checker::check_n_folds(n_folds)?;
        Ok(Self { n_folds, ..Self::default() })
    }


    /// Construct a selector over an explicit list of folds.
    pub fn with_folds(folds: Vec<Fold>) -> Result<Self> {
        checker::check_n_folds(folds.len())?;
        Ok(Self { n_folds: folds.len(), folds: Some(folds), ..Self::default() })
    }


    /// Shuffle the training container before generating folds.
    /// Default value is `false`.
    #[inline]
    pub fn shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }


    /// Set the seed of the fold shuffle.
    /// By default, the seed of the pruned model is used.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }


    /// Returns the number of folds.
    #[inline]
    pub fn n_folds(&self) -> usize {
        self.n_folds
    }


    fn folds(&self, ctx: &PruneContext<'_>) -> Vec<Fold> {
        if let Some(folds) = &self.folds {
            return folds.clone();
        }
        let cv = CrossValidation::new(ctx.container)
            .n_folds(self.n_folds)
            .seed(self.seed.unwrap_or(ctx.seed));
        if self.shuffle {
            cv.shuffle().collect()
        } else {
            cv.collect()
        }
    }


    /// Returns the cross-validated score of every tree of `sequence`.
    pub fn score_sequence(
        &self,
        sequence: &[PruningNode],
        ctx: &PruneContext<'_>,
    ) -> Result<Vec<f64>>
    {
        let folds = self.folds(ctx);
        for (i, fold) in folds.iter().enumerate() {
            let overlap = fold.test.iter()
                .filter(|&id| fold.train.contains(id))
                .count();
            if overlap > 0 {
                warn!(fold = i, overlap, "test subgraphs also appear in training");
            }
        }

        let mut rng = StdRng::seed_from_u64(ctx.seed);
        let seeds = (0..folds.len()).map(|_| rng.gen()).collect::<Vec<u64>>();
        let runs = folds.par_iter()
            .zip(seeds)
            .enumerate()
            .map(|(i, (fold, seed))| run_fold(i, fold, seed, ctx))
            .collect::<Result<Vec<_>>>()?;

        let mut scores = Vec::with_capacity(sequence.len());
        for (i, tree) in sequence.iter().enumerate() {
            if tree.root.is_leaf() {
                let total = tree.root.distribution().total();
                scores.push(tree.root.tree_error(total));
                continue;
            }

            let next_alpha = sequence.get(i + 1)
                .map(|next| next.alpha)
                .unwrap_or(tree.alpha);
            let target = (tree.alpha * next_alpha).sqrt();

            let mut predictions = Predictions::new();
            for run in runs.iter() {
                let fold_tree = run.tree_at(target);
                let mut fold_predictions = apply_tree(
                    fold_tree, &run.test_cache, &ctx.interrupt
                )?;
                fold_predictions.set_true_labels(&run.test_labels);
                predictions.set_predictions(fold_predictions)?;
            }
            let loss = predictions.zero_one_loss()?;
            debug!(alpha = tree.alpha, target, n_leaves = tree.leaf_count(), loss, "tree scored");
            scores.push(loss);
        }
        Ok(scores)
    }
}


impl TreeSelectionModule for CrossValidationSelection {
    fn name(&self) -> &str {
        "CrossValidationSelection"
    }


    fn select(&self, sequence: &[PruningNode], ctx: &PruneContext<'_>)
        -> Result<RptNode>
    {
        if sequence.is_empty() { return Err(RptError::EmptyPruningSequence); }

        info!(n_folds = self.n_folds, n_trees = sequence.len(), "cross-validating pruning sequence");
        let scores = self.score_sequence(sequence, ctx)?;
        let best = best_index(sequence, &scores)?;
        Ok(sequence[best].root.clone())
    }
}


struct FoldRun<'a> {
    sequence: Vec<PruningNode>,
    test_labels: LabelTable,
    test_cache: TableCache<'a>,
}


fn run_fold<'a>(i: usize, fold: &Fold, seed: u64, ctx: &PruneContext<'a>)
    -> Result<FoldRun<'a>>
{
    let labels = ctx.label_source.label_table(&fold.train)?;
    let cache = TableCache::new(fold.train.clone(), ctx.catalog);
    let mut sc = ScoreContext::new(seed, ctx.interrupt.clone());
    let tree = ctx.builder.learn(&labels, &cache, &mut sc)?;
    let sequence = pruning_sequence(&tree)?;
    debug!(fold = i, n_trees = sequence.len(), "fold tree learned");

    Ok(FoldRun {
        sequence,
        test_labels: ctx.label_source.label_table(&fold.test)?,
        test_cache: TableCache::new(fold.test.clone(), ctx.catalog),
    })
}


impl FoldRun<'_> {
    // The first tree whose alpha reaches `target`, or the last one.
    // A pruning sequence always holds at least its minimal subtree.
    fn tree_at(&self, target: f64) -> &RptNode {
        let last = self.sequence.len() - 1;
        let index = self.sequence.iter()
            .position(|t| t.alpha >= target)
            .unwrap_or(last);
        &self.sequence[index].root
    }
}
