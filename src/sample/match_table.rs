use rand::prelude::*;

use std::collections::BTreeMap;

use crate::common::SubgraphId;
use super::WeightedInstanceSet;


/// Outcome of a feature setting per subgraph.
/// An id absent from the table has a missing value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchTable {
    matches: BTreeMap<SubgraphId, bool>,
}


impl MatchTable {
    /// Construct an empty table.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }


    /// Record the outcome for `id`.
    #[inline]
    pub fn insert(&mut self, id: SubgraphId, matched: bool) {
        self.matches.insert(id, matched);
    }


    /// Returns the outcome for `id`, or `None` if missing.
    #[inline]
    pub fn get(&self, id: SubgraphId) -> Option<bool> {
        self.matches.get(&id).copied()
    }


    /// Returns the number of ids with a known outcome.
    #[inline]
    pub fn len(&self) -> usize {
        self.matches.len()
    }


    /// Returns `true` if no outcome is known.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }


    /// Iterates `(id, outcome)` pairs in ascending id order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (SubgraphId, bool)> + '_ {
        self.matches.iter().map(|(&id, &m)| (id, m))
    }


    /// Returns a copy in which the outcomes of the ids in `within`
    /// are shuffled among themselves.
    /// Outcomes of other ids are kept, and missing ids stay missing.
    pub fn permuted<R>(&self, within: &WeightedInstanceSet, rng: &mut R)
        -> Self
        where R: Rng + ?Sized
    {
        let ids = self.matches.keys()
            .copied()
            .filter(|&id| within.contains(id))
            .collect::<Vec<_>>();
        let mut values = ids.iter()
            .map(|id| self.matches[id])
            .collect::<Vec<_>>();
        values.shuffle(rng);

        let mut matches = self.matches.clone();
        matches.extend(ids.into_iter().zip(values));
        Self { matches }
    }
}


impl FromIterator<(SubgraphId, bool)> for MatchTable {
    fn from_iter<I>(iter: I) -> Self
        where I: IntoIterator<Item = (SubgraphId, bool)>
    {
        Self { matches: iter.into_iter().collect() }
    }
}
