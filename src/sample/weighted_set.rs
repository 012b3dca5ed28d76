use std::collections::BTreeMap;

use crate::common::SubgraphId;


/// Mapping from subgraph id to a nonnegative weight.
/// The population of subgraphs reaching a tree node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightedInstanceSet {
    weights: BTreeMap<SubgraphId, f64>,
}


impl WeightedInstanceSet {
    /// Construct an empty set.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }


    /// Construct a set giving every id weight `1`.
    pub fn uniform<I>(ids: I) -> Self
        where I: IntoIterator<Item = SubgraphId>
    {
        let weights = ids.into_iter()
            .map(|id| (id, 1f64))
            .collect();
        Self { weights }
    }


    /// Set the weight of `id`, replacing any previous weight.
    #[inline]
    pub fn insert(&mut self, id: SubgraphId, weight: f64) {
        self.weights.insert(id, weight);
    }


    /// Returns the weight of `id`, if present.
    #[inline]
    pub fn get(&self, id: SubgraphId) -> Option<f64> {
        self.weights.get(&id).copied()
    }


    /// Returns `true` if `id` is in this set.
    #[inline]
    pub fn contains(&self, id: SubgraphId) -> bool {
        self.weights.contains_key(&id)
    }


    /// Returns the number of ids in this set.
    #[inline]
    pub fn len(&self) -> usize {
        self.weights.len()
    }


    /// Returns `true` if the set holds no id.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }


    /// Returns the sum of all weights.
    #[inline]
    pub fn total_weight(&self) -> f64 {
        self.weights.values().sum()
    }


    /// Iterates `(id, weight)` pairs in ascending id order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (SubgraphId, f64)> + '_ {
        self.weights.iter().map(|(&id, &w)| (id, w))
    }


    /// Iterates the ids in ascending order.
    #[inline]
    pub fn ids(&self) -> impl Iterator<Item = SubgraphId> + '_ {
        self.weights.keys().copied()
    }
}


impl FromIterator<(SubgraphId, f64)> for WeightedInstanceSet {
    fn from_iter<I>(iter: I) -> Self
        where I: IntoIterator<Item = (SubgraphId, f64)>
    {
        Self { weights: iter.into_iter().collect() }
    }
}
