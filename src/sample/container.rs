use serde::{Serialize, Deserialize};

use std::collections::BTreeSet;

use crate::common::SubgraphId;


/// A named collection of subgraphs.
/// Training, test, and fold partitions are all containers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    name: String,
    subgraphs: BTreeSet<SubgraphId>,
}


impl Container {
    /// Construct a new container named `name`
    /// holding the given subgraph ids.
    pub fn new<S, I, T>(name: S, subgraphs: I) -> Self
        where S: Into<String>,
              I: IntoIterator<Item = T>,
              T: Into<SubgraphId>,
    {
        let subgraphs = subgraphs.into_iter()
            .map(|id| id.into())
            .collect();
        Self { name: name.into(), subgraphs, }
    }


    /// Returns the name of this container.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }


    /// Returns the number of subgraphs.
    #[inline]
    pub fn len(&self) -> usize {
        self.subgraphs.len()
    }


    /// Returns `true` if the container holds no subgraph.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.subgraphs.is_empty()
    }


    /// Returns `true` if `id` belongs to this container.
    #[inline]
    pub fn contains(&self, id: SubgraphId) -> bool {
        self.subgraphs.contains(&id)
    }


    /// Iterates the subgraph ids in ascending order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = SubgraphId> + '_ {
        self.subgraphs.iter().copied()
    }


    /// Returns a new container named `name`
    /// that keeps the subgraphs for which `keep` holds.
    pub fn filter<S, F>(&self, name: S, mut keep: F) -> Self
        where S: Into<String>,
              F: FnMut(SubgraphId) -> bool,
    {
        let subgraphs = self.iter()
            .filter(|&id| keep(id))
            .collect();
        Self { name: name.into(), subgraphs, }
    }
}
