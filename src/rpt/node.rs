//! Defines the nodes of a learned RPT
//! and the resubstitution errors used by the pruner.
use colored::Colorize;
use serde::{Serialize, Deserialize};

use std::fmt;

use crate::distribution::ProbDistribution;
use crate::sample::FeatureSetting;


/// Enumeration of `BranchNode` and `LeafNode`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RptNode {
    /// A node that has a split and two children.
    Branch(BranchNode),


    /// A node that has no split.
    Leaf(LeafNode),
}


/// Represents the branch nodes of an RPT.
/// Each `BranchNode` has exactly two children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchNode {
    pub(crate) split: FeatureSetting,
    // Distribution over every instance reaching this node.
    pub(crate) distribution: ProbDistribution,
    pub(crate) yes: Box<RptNode>,
    pub(crate) no: Box<RptNode>,
}


/// Represents the leaf nodes of an RPT.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeafNode {
    pub(crate) distribution: ProbDistribution,
}


impl RptNode {
    /// Construct a leaf node.
    #[inline]
    pub fn leaf(distribution: ProbDistribution) -> Self {
        Self::Leaf(LeafNode { distribution })
    }


    /// Construct a branch node.
    #[inline]
    pub fn branch(
        split: FeatureSetting,
        distribution: ProbDistribution,
        yes: RptNode,
        no: RptNode,
    ) -> Self
    {
        Self::Branch(BranchNode {
            split,
            distribution,
            yes: Box::new(yes),
            no: Box::new(no),
        })
    }


    /// Returns `true` if this node has no split.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }


    /// Returns the split of this node, `None` for a leaf.
    #[inline]
    pub fn split(&self) -> Option<&FeatureSetting> {
        match self {
            Self::Branch(b) => Some(&b.split),
            Self::Leaf(_) => None,
        }
    }


    /// Returns the distribution of the instances reaching this node.
    #[inline]
    pub fn distribution(&self) -> &ProbDistribution {
        match self {
            Self::Branch(b) => &b.distribution,
            Self::Leaf(l) => &l.distribution,
        }
    }


    /// Returns the child taken by matching instances.
    #[inline]
    pub fn yes_branch(&self) -> Option<&RptNode> {
        match self {
            Self::Branch(b) => Some(&b.yes),
            Self::Leaf(_) => None,
        }
    }


    /// Returns the child taken by non-matching instances.
    #[inline]
    pub fn no_branch(&self) -> Option<&RptNode> {
        match self {
            Self::Branch(b) => Some(&b.no),
            Self::Leaf(_) => None,
        }
    }


    /// Returns the number of leaves of this sub-tree.
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Branch(b) => b.yes.leaf_count() + b.no.leaf_count(),
            Self::Leaf(_) => 1,
        }
    }


    /// Returns the number of nodes of this sub-tree.
    pub fn node_count(&self) -> usize {
        match self {
            Self::Branch(b) => 1 + b.yes.node_count() + b.no.node_count(),
            Self::Leaf(_) => 1,
        }
    }


    /// Returns the length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        match self {
            Self::Branch(b) => 1 + b.yes.depth().max(b.no.depth()),
            Self::Leaf(_) => 0,
        }
    }


    /// Returns the splits of this sub-tree in pre-order.
    pub fn splits(&self) -> Vec<&FeatureSetting> {
        let mut splits = Vec::new();
        self.collect_splits(&mut splits);
        splits
    }


    fn collect_splits<'a>(&'a self, splits: &mut Vec<&'a FeatureSetting>) {
        if let Self::Branch(b) = self {
            splits.push(&b.split);
            b.yes.collect_splits(splits);
            b.no.collect_splits(splits);
        }
    }


    /// Returns a leaf carrying this node's distribution.
    #[inline]
    pub fn to_leaf(&self) -> Self {
        Self::leaf(self.distribution().clone())
    }


    /// Resubstitution error of this node as a leaf:
    /// `(1 - majority / n) * (n / total)`.
    pub fn node_error(&self, total: f64) -> f64 {
        let dist = self.distribution();
        let n = dist.total();
        if n <= 0f64 || total <= 0f64 { return 0f64; }

        let majority = match dist {
            ProbDistribution::Discrete(d) => d.max_count(),
            ProbDistribution::Continuous(_) => n,
        };
        (1f64 - majority / n) * (n / total)
    }


    /// Resubstitution error of this sub-tree,
    /// the sum of the errors of its leaves.
    pub fn tree_error(&self, total: f64) -> f64 {
        match self {
            Self::Branch(b) => b.yes.tree_error(total) + b.no.tree_error(total),
            Self::Leaf(_) => self.node_error(total),
        }
    }


    pub(crate) fn to_dot_info(&self, id: usize) -> (Vec<String>, usize) {
        match self {
            Self::Branch(b) => {
                let b_info = format!(
                    "\tnode_{id} [ label = \"{split} ?\" ];\n",
                    split = b.split.signature().replace('"', "\\\""),
                );

                let (y_info, next_id) = b.yes.to_dot_info(id + 1);
                let (mut n_info, ret_id) = b.no.to_dot_info(next_id);

                let mut info = y_info;
                info.push(b_info);
                info.append(&mut n_info);

                info.push(format!(
                    "\tnode_{id} -- node_{y_id} [ label = \"Yes\" ];\n",
                    y_id = id + 1
                ));
                info.push(format!(
                    "\tnode_{id} -- node_{n_id} [ label = \"No\" ];\n",
                    n_id = next_id
                ));

                (info, ret_id)
            },
            Self::Leaf(l) => {
                let info = format!(
                    "\tnode_{id} [ label = \"{d}\", shape = box, ];\n",
                    d = l.distribution.to_string().replace('"', "\\\""),
                );

                (vec![info], id + 1)
            },
        }
    }


    pub(crate) fn fmt_indented(
        &self,
        f: &mut fmt::Formatter<'_>,
        depth: usize,
        full: bool,
    ) -> fmt::Result
    {
        let indent = "  ".repeat(depth);
        match self {
            Self::Branch(b) => {
                write!(f, "{indent}{}", b.split.signature().bold())?;
                if full {
                    write!(f, " {}", format!("{}", b.distribution).dimmed())?;
                }
                writeln!(f)?;
                writeln!(f, "{indent}{}", "+ yes:".green())?;
                b.yes.fmt_indented(f, depth + 1, full)?;
                writeln!(f, "{indent}{}", "+ no:".red())?;
                b.no.fmt_indented(f, depth + 1, full)
            },
            Self::Leaf(l) => {
                writeln!(f, "{indent}{}", format!("{}", l.distribution).yellow())
            },
        }
    }
}


impl fmt::Display for RptNode {
    /// `{}` prints the splits and leaf distributions,
    /// `{:#}` adds the distribution of every branch node.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0, f.alternate())
    }
}


/// A tree in a pruning sequence, tagged with its cost-complexity alpha.
#[derive(Debug, Clone, PartialEq)]
pub struct PruningNode {
    pub(crate) alpha: f64,
    pub(crate) root: RptNode,
}


impl PruningNode {
    /// Construct a new pruning node.
    #[inline]
    pub fn new(alpha: f64, root: RptNode) -> Self {
        Self { alpha, root }
    }


    /// Returns the cost-complexity alpha of this tree.
    #[inline]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }


    /// Returns the root of this tree.
    #[inline]
    pub fn root(&self) -> &RptNode {
        &self.root
    }


    /// Returns the number of leaves of this tree.
    #[inline]
    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }


    /// Consume `self` and return the root.
    #[inline]
    pub fn into_root(self) -> RptNode {
        self.root
    }
}
