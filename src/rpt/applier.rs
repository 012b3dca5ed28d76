//! Inference of a learned tree over a container.
use crate::common::Interrupt;
use crate::error::Result;
use crate::predictions::Predictions;
use crate::sample::WeightedInstanceSet;
use super::branching;
use super::node::RptNode;
use super::state::TableCache;


/// Apply `root` to every subgraph of `cache`'s container,
/// each with weight `1`.
pub fn apply_tree(root: &RptNode, cache: &TableCache<'_>, interrupt: &Interrupt)
    -> Result<Predictions>
{
    let instances = WeightedInstanceSet::uniform(cache.container().iter());
    apply_weighted(root, &instances, cache, interrupt)
}


/// Apply `root` to the weighted `instances`.
///
/// A subgraph whose value is missing at some branch reaches
/// several leaves. Its prediction is the merge of their distributions,
/// each scaled by the weight the subgraph carries into that leaf.
pub fn apply_weighted(
    root: &RptNode,
    instances: &WeightedInstanceSet,
    cache: &TableCache<'_>,
    interrupt: &Interrupt,
) -> Result<Predictions>
{
    let mut predictions = Predictions::new();
    apply_node(root, instances, cache, interrupt, &mut predictions)?;
    Ok(predictions)
}


fn apply_node(
    node: &RptNode,
    instances: &WeightedInstanceSet,
    cache: &TableCache<'_>,
    interrupt: &Interrupt,
    predictions: &mut Predictions,
) -> Result<()>
{
    interrupt.check()?;
    match node {
        RptNode::Leaf(leaf) => {
            for (id, weight) in instances.iter() {
                predictions.set_prediction(id, leaf.distribution.scaled(weight))?;
            }
        },
        RptNode::Branch(b) => {
            let matches = cache.match_table(&b.split)?;
            let (yes, no) = branching::branch(instances, &matches);
            apply_node(&b.yes, &yes, cache, interrupt, predictions)?;
            apply_node(&b.no, &no, cache, interrupt, predictions)?;
        },
    }
    Ok(())
}
