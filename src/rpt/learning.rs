//! The recursive tree-induction algorithm.
use rand::prelude::*;
use tracing::{debug, debug_span};

use std::sync::Arc;

use crate::distribution::ProbDistribution;
use crate::error::{RptError, Result};
use crate::sample::{LabelTable, WeightedInstanceSet};
use super::branching;
use super::node::RptNode;
use super::scoring::{ChiSquareScore, RmseScore, ScoringModule};
use super::significance::{DefaultSignificanceModule, SignificanceModule};
use super::splitting::{DefaultSplittingModule, Split, SplittingModule};
use super::state::{CandidatePool, RecursionState, ScoreContext, TableCache};
use super::stopping::{DefaultStoppingModule, StoppingModule};


/// A leaf split found by [`TreeBuilder::next_split`].
#[derive(Debug, Clone, PartialEq)]
pub struct Expansion {
    // Branch choices from the root, `true` for the yes branch.
    pub(crate) path: Vec<bool>,
    pub(crate) split: Split,
    pub(crate) yes: ProbDistribution,
    pub(crate) no: ProbDistribution,
}


impl Expansion {
    /// Returns the branch choices from the root to the expanded leaf,
    /// `true` for the yes branch.
    #[inline]
    pub fn path(&self) -> &[bool] {
        &self.path[..]
    }


    /// Returns the split that would be installed at the leaf.
    #[inline]
    pub fn split(&self) -> &Split {
        &self.split
    }
}


/// Grows an RPT from a label table and a match-table cache.
/// Each concern of the recursion is delegated to a module.
#[derive(Clone)]
pub struct TreeBuilder {
    scoring: Arc<dyn ScoringModule>,
    splitting: Arc<dyn SplittingModule>,
    stopping: Arc<dyn StoppingModule>,
    significance: Arc<dyn SignificanceModule>,
}


impl TreeBuilder {
    /// Construct a builder from its modules.
    pub fn new(
        scoring: Arc<dyn ScoringModule>,
        splitting: Arc<dyn SplittingModule>,
        stopping: Arc<dyn StoppingModule>,
        significance: Arc<dyn SignificanceModule>,
    ) -> Self
    {
        Self { scoring, splitting, stopping, significance, }
    }


    /// Construct a builder with the default modules.
    /// The scoring module is [`RmseScore`] for a continuous label
    /// and [`ChiSquareScore`] otherwise.
    pub fn with_defaults(continuous: bool) -> Self {
        let scoring: Arc<dyn ScoringModule> = if continuous {
            Arc::new(RmseScore::new())
        } else {
            Arc::new(ChiSquareScore::new())
        };
        Self::new(
            scoring,
            Arc::new(DefaultSplittingModule::new()),
            Arc::new(DefaultStoppingModule::new()),
            Arc::new(DefaultSignificanceModule::default()),
        )
    }


    /// Returns the scoring module.
    #[inline]
    pub fn scoring(&self) -> &dyn ScoringModule {
        self.scoring.as_ref()
    }


    /// Learn a tree over every subgraph of `labels`, each with weight `1`.
    pub fn learn(
        &self,
        labels: &LabelTable,
        cache: &TableCache<'_>,
        ctx: &mut ScoreContext,
    ) -> Result<RptNode>
    {
        let ids = labels.subgraph_ids();
        if ids.is_empty() {
            return Err(RptError::EmptyInstanceSet {
                container: cache.container().name().to_string(),
            });
        }
        let instances = WeightedInstanceSet::uniform(ids);
        self.learn_from(instances, labels, cache, ctx)
    }


    /// Learn a tree over the given weighted instances.
    pub fn learn_from(
        &self,
        instances: WeightedInstanceSet,
        labels: &LabelTable,
        cache: &TableCache<'_>,
        ctx: &mut ScoreContext,
    ) -> Result<RptNode>
    {
        let pool = CandidatePool::new(cache.feature_settings()?);
        let state = RecursionState::root(instances, pool, labels, cache);
        self.learn_node(&state, ctx)
    }


    fn learn_node(&self, state: &RecursionState<'_>, ctx: &mut ScoreContext)
        -> Result<RptNode>
    {
        ctx.interrupt.check()?;
        let span = debug_span!(
            "node",
            depth = state.depth.get(),
            n_instances = state.instances.len()
        );
        let _enter = span.enter();

        let dist = ProbDistribution::estimate(state.labels, &state.instances);
        if self.stopping.is_stop(state, &dist) {
            return Ok(RptNode::leaf(dist));
        }

        let split = self.splitting.choose_split(state, self.scoring(), ctx)?;
        let Some(split) = split else {
            return Ok(RptNode::leaf(dist));
        };
        let significant = self.significance
            .is_significant(&split, state, self.scoring(), ctx)?;
        if !significant {
            debug!(setting = split.setting.signature(), score = %split.score, "split rejected");
            return Ok(RptNode::leaf(dist));
        }
        debug!(setting = split.setting.signature(), score = %split.score, "split chosen");

        let matches = state.cache.match_table(&split.setting)?;
        let (yes, no) = branching::branch(&state.instances, &matches);

        // Both children see the pool without the chosen setting.
        // The parent's pool is untouched, so the setting stays
        // available to every other subtree.
        let pool = state.pool.check_out(split.index);
        let yes = self.learn_node(&state.descend(yes, pool.clone()), ctx)?;
        let no = self.learn_node(&state.descend(no, pool), ctx)?;

        Ok(RptNode::branch(split.setting, dist, yes, no))
    }


    /// Find the best split of any expandable leaf of `root`.
    ///
    /// A leaf is expandable when the stopping module lets it grow
    /// and its live pool is non-empty.
    /// Between two subtrees with equally good splits,
    /// the choice is made by `ctx`'s random generator.
    pub fn next_split(
        &self,
        root: &RptNode,
        labels: &LabelTable,
        cache: &TableCache<'_>,
        ctx: &mut ScoreContext,
    ) -> Result<Option<Expansion>>
    {
        let instances = WeightedInstanceSet::uniform(labels.subgraph_ids());
        let pool = CandidatePool::new(cache.feature_settings()?);
        let state = RecursionState::root(instances, pool, labels, cache);
        let mut path = Vec::new();
        self.next_split_at(root, &state, &mut path, ctx)
    }


    fn next_split_at(
        &self,
        node: &RptNode,
        state: &RecursionState<'_>,
        path: &mut Vec<bool>,
        ctx: &mut ScoreContext,
    ) -> Result<Option<Expansion>>
    {
        ctx.interrupt.check()?;

        let RptNode::Branch(branch) = node else {
            let dist = ProbDistribution::estimate(state.labels, &state.instances);
            if self.stopping.is_stop(state, &dist) { return Ok(None); }

            let split = self.splitting.choose_split(state, self.scoring(), ctx)?;
            let Some(split) = split else { return Ok(None); };

            let matches = state.cache.match_table(&split.setting)?;
            let (yes, no) = branching::branch(&state.instances, &matches);
            let expansion = Expansion {
                path: path.clone(),
                yes: ProbDistribution::estimate(state.labels, &yes),
                no: ProbDistribution::estimate(state.labels, &no),
                split,
            };
            return Ok(Some(expansion));
        };

        let matches = state.cache.match_table(&branch.split)?;
        let (yes, no) = branching::branch(&state.instances, &matches);
        let pool = state.pool.check_out_setting(&branch.split);

        path.push(true);
        let left = self.next_split_at(
            &branch.yes, &state.descend(yes, pool.clone()), path, ctx
        )?;
        path.pop();

        path.push(false);
        let right = self.next_split_at(
            &branch.no, &state.descend(no, pool), path, ctx
        )?;
        path.pop();

        let chosen = match (left, right) {
            (None, None) => None,
            (Some(l), None) => Some(l),
            (None, Some(r)) => Some(r),
            (Some(l), Some(r)) => {
                if l.split.score.is_better_than(&r.split.score)? {
                    Some(l)
                } else if r.split.score.is_better_than(&l.split.score)? {
                    Some(r)
                } else if ctx.rng.gen_bool(0.5) {
                    Some(l)
                } else {
                    Some(r)
                }
            },
        };
        Ok(chosen)
    }


    /// Returns a copy of `root` in which the leaf addressed by
    /// `expansion` is replaced by its split and two new leaves.
    pub fn apply_split(root: &RptNode, expansion: &Expansion)
        -> Result<RptNode>
    {
        Self::apply_split_at(root, expansion, 0)
    }


    fn apply_split_at(node: &RptNode, expansion: &Expansion, level: usize)
        -> Result<RptNode>
    {
        let stale = || RptError::StaleExpansion { path: expansion.path.clone() };
        match (node, expansion.path.get(level)) {
            (RptNode::Leaf(leaf), None) => {
                Ok(RptNode::branch(
                    expansion.split.setting.clone(),
                    leaf.distribution.clone(),
                    RptNode::leaf(expansion.yes.clone()),
                    RptNode::leaf(expansion.no.clone()),
                ))
            },
            (RptNode::Branch(b), Some(&go_yes)) => {
                let (yes, no) = if go_yes {
                    (Self::apply_split_at(&b.yes, expansion, level + 1)?, (*b.no).clone())
                } else {
                    ((*b.yes).clone(), Self::apply_split_at(&b.no, expansion, level + 1)?)
                };
                Ok(RptNode::branch(b.split.clone(), b.distribution.clone(), yes, no))
            },
            _ => Err(stale()),
        }
    }
}
