use tracing::{info, instrument};

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::common::Interrupt;
use crate::error::{RptError, Result};
use crate::predictions::Predictions;
use crate::sample::{Container, FeatureCatalog, FeatureSetting, LabelSource};
use super::applier::apply_tree;
use super::builder::RptConfig;
use super::learning::TreeBuilder;
use super::node::RptNode;
use super::pruning::{PruneContext, PruningModule};
use super::state::{ScoreContext, TableCache};


/// A Relational Probability Tree.
///
/// Construct one with [`RptBuilder`](crate::RptBuilder),
/// then call [`Rpt::learn`].
///
/// # Example
/// ```no_run
/// use rptree::prelude::*;
///
/// let labels = AttributeLabels::discrete(
///     "label", [(1, "+"), (2, "-"), (3, "-")]
/// );
/// let mut catalog = MatchTableCatalog::new();
/// catalog.insert_matches(
///     FeatureSetting::new("neighbor.color", "count", 1),
///     [(1, true), (2, false), (3, false)],
/// );
///
/// let container = labels.container("train");
/// let mut rpt = RptBuilder::new()
///     .p_value(0.06)
///     .min_instances(0.0)
///     .build()
///     .unwrap();
/// rpt.learn(&container, &labels, &catalog).unwrap();
///
/// let predictions = rpt.apply(&container, &catalog).unwrap();
/// println!("{rpt}");
/// ```
pub struct Rpt {
    config: RptConfig,
    interrupt: Interrupt,
    tree_builder: Option<TreeBuilder>,
    pruning: Arc<dyn PruningModule>,

    root: Option<RptNode>,
    class_label: Option<String>,
}


impl Rpt {
    pub(crate) fn from_components(
        config: RptConfig,
        interrupt: Interrupt,
        tree_builder: Option<TreeBuilder>,
        pruning: Arc<dyn PruningModule>,
    ) -> Self
    {
        Self {
            config,
            interrupt,
            tree_builder,
            pruning,
            root: None,
            class_label: None,
        }
    }


    /// Adopt an existing tree as a learned model
    /// with the default configuration.
    pub fn from_root<S>(root: RptNode, class_label: S) -> Result<Self>
        where S: Into<String>
    {
        let config = RptConfig::default();
        let pruning = config.pruning_module()?;
        let mut rpt = Self::from_components(
            config, Interrupt::new(), None, pruning
        );
        rpt.root = Some(root);
        rpt.class_label = Some(class_label.into());
        Ok(rpt)
    }


    /// Returns the configuration of this model.
    #[inline]
    pub fn config(&self) -> &RptConfig {
        &self.config
    }


    /// Returns `true` once a tree is learned.
    #[inline]
    pub fn is_trained(&self) -> bool {
        self.root.is_some()
    }


    /// Learn a tree over the subgraphs of `container`,
    /// then prune it with the configured pruning module.
    ///
    /// A previously learned tree is replaced.
    #[instrument(
        skip_all,
        fields(container = container.name(), n_subgraphs = container.len())
    )]
    pub fn learn(
        &mut self,
        container: &Container,
        label_source: &dyn LabelSource,
        catalog: &dyn FeatureCatalog,
    ) -> Result<()>
    {
        self.interrupt.check()?;
        let labels = label_source.label_table(container)?;
        let continuous = label_source.is_continuous();
        let builder = match &self.tree_builder {
            Some(builder) => builder.clone(),
            None => self.config.tree_builder(continuous)?,
        };
        info!(
            label = label_source.name(),
            continuous,
            scoring = builder.scoring().name(),
            "learning started"
        );

        let learned = {
            let cache = TableCache::new(container.clone(), catalog);
            let mut ctx = ScoreContext::new(self.config.seed, self.interrupt.clone());
            builder.learn(&labels, &cache, &mut ctx)?
        };
        info!(
            n_leaves = learned.leaf_count(),
            depth = learned.depth(),
            "tree learned"
        );

        let ctx = PruneContext::new(
            container,
            label_source,
            catalog,
            &builder,
            self.config.seed,
            self.interrupt.clone(),
        );
        let root = self.pruning.prune(&learned, &ctx)?;
        info!(pruning = self.pruning.name(), n_leaves = root.leaf_count(), "learning finished");

        self.root = Some(root);
        self.class_label = Some(label_source.name().to_string());
        Ok(())
    }


    /// Apply the learned tree to every subgraph of `container`.
    pub fn apply(&self, container: &Container, catalog: &dyn FeatureCatalog)
        -> Result<Predictions>
    {
        let cache = TableCache::new(container.clone(), catalog);
        self.apply_with_cache(&cache)
    }


    /// Apply the learned tree using an existing match-table cache,
    /// so repeated calls on one container reuse its tables.
    pub fn apply_with_cache(&self, cache: &TableCache<'_>) -> Result<Predictions> {
        let root = self.root_for("apply")?;
        apply_tree(root, cache, &self.interrupt)
    }


    fn root_for(&self, operation: &'static str) -> Result<&RptNode> {
        self.root.as_ref()
            .ok_or(RptError::Untrained { operation })
    }


    /// Returns the root of the learned tree.
    #[inline]
    pub fn root(&self) -> Result<&RptNode> {
        self.root_for("root")
    }


    /// Returns the depth of the learned tree.
    #[inline]
    pub fn depth(&self) -> Result<usize> {
        self.root_for("depth").map(RptNode::depth)
    }


    /// Returns the number of leaves of the learned tree.
    #[inline]
    pub fn leaf_count(&self) -> Result<usize> {
        self.root_for("leaf_count").map(RptNode::leaf_count)
    }


    /// Returns the feature settings of the learned tree in pre-order.
    pub fn learned_splits(&self) -> Result<Vec<&FeatureSetting>> {
        self.root_for("learned_splits").map(RptNode::splits)
    }


    /// Returns the name of the label the tree was learned for.
    pub fn class_label(&self) -> Result<&str> {
        self.class_label.as_deref()
            .ok_or(RptError::Untrained { operation: "class_label" })
    }


    /// Returns the learned tree in the `dot` language.
    pub fn to_dot(&self) -> Result<String> {
        let root = self.root_for("to_dot")?;
        let mut dot = String::from("graph RelationalProbabilityTree {\n");
        root.to_dot_info(0).0
            .into_iter()
            .for_each(|row| dot.push_str(&row));
        dot.push('}');
        Ok(dot)
    }


    /// Write the learned tree to `path` in the `dot` language.
    pub fn to_dot_file<P>(&self, path: P) -> Result<()>
        where P: AsRef<Path>
    {
        let path = path.as_ref();
        let dot = self.to_dot()?;
        std::fs::write(path, dot)
            .map_err(|e| RptError::WriteModel { path: path.to_path_buf(), source: e })
    }


    pub(crate) fn parts(&self) -> Result<(&RptConfig, &str, &RptNode)> {
        let root = self.root_for("save")?;
        let class_label = self.class_label.as_deref()
            .ok_or(RptError::Untrained { operation: "save" })?;
        Ok((&self.config, class_label, root))
    }


    pub(crate) fn from_parts(config: RptConfig, class_label: String, root: RptNode)
        -> Result<Self>
    {
        config.validate()?;
        let pruning = config.pruning_module()?;
        let mut rpt = Self::from_components(
            config, Interrupt::new(), None, pruning
        );
        rpt.root = Some(root);
        rpt.class_label = Some(class_label);
        Ok(rpt)
    }
}


impl fmt::Display for Rpt {
    /// `{}` prints the tree, `{:#}` adds the distribution of every branch.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.root, &self.class_label) {
            (Some(root), Some(label)) => {
                writeln!(f, "RPT for `{label}`")?;
                root.fmt_indented(f, 0, f.alternate())
            },
            _ => writeln!(f, "RPT (untrained)"),
        }
    }
}
