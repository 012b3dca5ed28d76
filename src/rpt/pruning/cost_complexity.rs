use tracing::{debug, info};

use std::sync::Arc;

use crate::error::{RptError, Result};
use crate::rpt::node::{PruningNode, RptNode};
use super::{PruneContext, PruningModule, TreeSelectionModule};


// Two errors or two alphas closer than this are equal.
const TOLERANCE: f64 = 1e-12;


/// Returns the minimal subtree `T1` of `root`.
///
/// Bottom-up, a branch whose children are both leaves is collapsed
/// when its own resubstitution error equals the sum of its children's.
pub fn minimal_subtree(root: &RptNode) -> RptNode {
    let total = root.distribution().total();
    reduce(root, total)
}


fn reduce(node: &RptNode, total: f64) -> RptNode {
    let RptNode::Branch(b) = node else { return node.clone(); };

    let yes = reduce(&b.yes, total);
    let no = reduce(&b.no, total);
    if yes.is_leaf() && no.is_leaf() {
        let split_error = yes.node_error(total) + no.node_error(total);
        if (node.node_error(total) - split_error).abs() < TOLERANCE {
            return node.to_leaf();
        }
    }
    RptNode::branch(b.split.clone(), b.distribution.clone(), yes, no)
}


// g(t) = (R(t) - R(T_t)) / (|leaves(T_t)| - 1)
fn link_strength(node: &RptNode, total: f64) -> f64 {
    let n_leaves = node.leaf_count() as f64;
    (node.node_error(total) - node.tree_error(total)) / (n_leaves - 1f64)
}


fn weakest_link(node: &RptNode, total: f64) -> Option<f64> {
    let RptNode::Branch(b) = node else { return None; };

    let here = link_strength(node, total);
    [weakest_link(&b.yes, total), weakest_link(&b.no, total)]
        .into_iter()
        .flatten()
        .chain(std::iter::once(here))
        .reduce(f64::min)
}


fn collapse(node: &RptNode, alpha: f64, total: f64) -> RptNode {
    let RptNode::Branch(b) = node else { return node.clone(); };

    if link_strength(node, total) <= alpha + TOLERANCE {
        return node.to_leaf();
    }
    RptNode::branch(
        b.split.clone(),
        b.distribution.clone(),
        collapse(&b.yes, alpha, total),
        collapse(&b.no, alpha, total),
    )
}


/// Returns the weakest-link pruning sequence of `root`.
///
/// The first member is the minimal subtree with alpha `0`.
/// Each following member collapses every node whose link strength
/// equals the current minimum, and carries that minimum as its alpha.
/// The last member is a single leaf.
/// `root` is never modified.
pub fn pruning_sequence(root: &RptNode) -> Result<Vec<PruningNode>> {
    if root.distribution().is_continuous() {
        return Err(RptError::UnsupportedLabel {
            operation: "cost-complexity pruning",
            continuous: true,
        });
    }

    let total = root.distribution().total();
    let mut current = minimal_subtree(root);
    let mut sequence = vec![PruningNode::new(0f64, current.clone())];

    while let Some(alpha) = weakest_link(&current, total) {
        current = collapse(&current, alpha, total);
        debug!(alpha, n_leaves = current.leaf_count(), "weakest links collapsed");
        sequence.push(PruningNode::new(alpha, current.clone()));
    }
    Ok(sequence)
}


/// Cost-complexity pruning.
/// The kept tree is chosen from the pruning sequence by `selection`.
#[derive(Clone)]
pub struct CostComplexityPruning {
    selection: Arc<dyn TreeSelectionModule>,
}


impl CostComplexityPruning {
    /// Construct a pruning module with the given selection strategy.
    pub fn new<T>(selection: T) -> Self
        where T: TreeSelectionModule + 'static
    {
        Self { selection: Arc::new(selection) }
    }
}


impl PruningModule for CostComplexityPruning {
    fn name(&self) -> &str {
        "CostComplexityPruning"
    }


    fn prune(&self, root: &RptNode, ctx: &PruneContext<'_>) -> Result<RptNode> {
        ctx.interrupt.check()?;
        let sequence = pruning_sequence(root)?;
        info!(
            n_trees = sequence.len(),
            selection = self.selection.name(),
            "pruning sequence built"
        );

        let selected = self.selection.select(&sequence, ctx)?;
        info!(
            n_leaves = selected.leaf_count(),
            learned_leaves = root.leaf_count(),
            "pruned tree selected"
        );
        Ok(selected)
    }
}
