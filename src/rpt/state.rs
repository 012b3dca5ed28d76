//! Context threaded through the recursive learn and apply calls.
use fixedbitset::FixedBitSet;
use rand::prelude::*;
use tracing::debug;

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::common::{Depth, Interrupt};
use crate::error::Result;
use crate::sample::{
    Container,
    FeatureCatalog,
    FeatureSetting,
    LabelTable,
    MatchTable,
    WeightedInstanceSet,
};


/// Match tables of one container, loaded lazily from a catalog
/// and cached by feature-setting signature.
///
/// A cache lives for one learn or apply call
/// (or longer, via [`Rpt::apply_with_cache`](crate::Rpt::apply_with_cache))
/// and releases its tables when dropped.
pub struct TableCache<'a> {
    container: Container,
    catalog: &'a dyn FeatureCatalog,
    tables: RwLock<HashMap<String, Arc<MatchTable>>>,
}


impl<'a> TableCache<'a> {
    /// Construct an empty cache for `container`.
    pub fn new(container: Container, catalog: &'a dyn FeatureCatalog) -> Self {
        Self { container, catalog, tables: RwLock::new(HashMap::new()), }
    }


    /// Returns the container this cache serves.
    #[inline]
    pub fn container(&self) -> &Container {
        &self.container
    }


    /// Returns the catalog backing this cache.
    #[inline]
    pub fn catalog(&self) -> &'a dyn FeatureCatalog {
        self.catalog
    }


    /// Returns the feature settings applicable to the container.
    #[inline]
    pub fn feature_settings(&self) -> Result<Vec<FeatureSetting>> {
        self.catalog.feature_settings(&self.container)
    }


    /// Returns the match table of `setting`,
    /// asking the catalog on the first request.
    pub fn match_table(&self, setting: &FeatureSetting)
        -> Result<Arc<MatchTable>>
    {
        let key = setting.signature();
        {
            let tables = self.tables.read()
                .unwrap_or_else(PoisonError::into_inner);
            if let Some(table) = tables.get(key) {
                return Ok(Arc::clone(table));
            }
        }

        let table = Arc::new(self.catalog.match_table(&self.container, setting)?);
        debug!(setting = key, n_matches = table.len(), "match table loaded");

        let mut tables = self.tables.write()
            .unwrap_or_else(PoisonError::into_inner);
        let table = tables.entry(key.to_string())
            .or_insert(table);
        Ok(Arc::clone(table))
    }


    /// Returns the number of cached tables.
    pub fn len(&self) -> usize {
        self.tables.read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }


    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }


    /// Drop every cached table.
    pub fn clear(&self) {
        self.tables.write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}


/// The candidate feature settings of a node.
/// A setting chosen by an ancestor is checked out of its subtree
/// but stays available to every other subtree.
#[derive(Debug, Clone)]
pub struct CandidatePool {
    settings: Arc<[FeatureSetting]>,
    checked_out: FixedBitSet,
}


impl CandidatePool {
    /// Construct a pool in which every setting is available.
    pub fn new(settings: Vec<FeatureSetting>) -> Self {
        let checked_out = FixedBitSet::with_capacity(settings.len());
        Self { settings: settings.into(), checked_out, }
    }


    /// Iterates the available settings with their pool index.
    pub fn available(&self) -> impl Iterator<Item = (usize, &FeatureSetting)> + '_ {
        self.settings.iter()
            .enumerate()
            .filter(|(i, _)| !self.checked_out.contains(*i))
    }


    /// Returns the number of available settings.
    #[inline]
    pub fn len(&self) -> usize {
        self.settings.len() - self.checked_out.count_ones(..)
    }


    /// Returns `true` if no setting is available.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }


    /// Returns a copy of this pool without the setting at `index`.
    #[inline]
    pub fn check_out(&self, index: usize) -> Self {
        let mut pool = self.clone();
        pool.checked_out.insert(index);
        pool
    }


    /// Returns a copy of this pool without `setting`.
    pub fn check_out_setting(&self, setting: &FeatureSetting) -> Self {
        match self.settings.iter().position(|s| s == setting) {
            Some(index) => self.check_out(index),
            None => self.clone(),
        }
    }
}


/// Seeded randomness and the cancellation token of one computation.
#[derive(Debug, Clone)]
pub struct ScoreContext {
    pub(crate) rng: StdRng,
    pub(crate) interrupt: Interrupt,
}


impl ScoreContext {
    /// Construct a context seeded with `seed`.
    #[inline]
    pub fn new(seed: u64, interrupt: Interrupt) -> Self {
        Self { rng: StdRng::seed_from_u64(seed), interrupt, }
    }


    /// Returns the random generator.
    #[inline]
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }


    /// Returns the cancellation token.
    #[inline]
    pub fn interrupt(&self) -> &Interrupt {
        &self.interrupt
    }


    /// Draw `n` seeds for independent sub-computations.
    pub(crate) fn child_seeds(&mut self, n: usize) -> Vec<u64> {
        (0..n).map(|_| self.rng.gen()).collect()
    }
}


/// The state of one recursive step of learning.
pub struct RecursionState<'a> {
    pub(crate) instances: WeightedInstanceSet,
    pub(crate) pool: CandidatePool,
    pub(crate) depth: Depth,
    pub(crate) labels: &'a LabelTable,
    pub(crate) cache: &'a TableCache<'a>,
}


impl<'a> RecursionState<'a> {
    /// Construct the state of the root node.
    pub fn root(
        instances: WeightedInstanceSet,
        pool: CandidatePool,
        labels: &'a LabelTable,
        cache: &'a TableCache<'a>,
    ) -> Self
    {
        Self { instances, pool, depth: Depth::ROOT, labels, cache, }
    }


    /// Returns the state of a child node.
    #[inline]
    pub fn descend(&self, instances: WeightedInstanceSet, pool: CandidatePool)
        -> Self
    {
        Self {
            instances,
            pool,
            depth: self.depth + 1,
            labels: self.labels,
            cache: self.cache,
        }
    }


    /// Returns the instances reaching this node.
    #[inline]
    pub fn instances(&self) -> &WeightedInstanceSet {
        &self.instances
    }


    /// Returns the live candidate pool.
    #[inline]
    pub fn pool(&self) -> &CandidatePool {
        &self.pool
    }


    /// Returns the depth of this node.
    #[inline]
    pub fn depth(&self) -> Depth {
        self.depth
    }


    /// Returns the label table of the training container.
    #[inline]
    pub fn labels(&self) -> &LabelTable {
        self.labels
    }


    /// Returns the match-table cache.
    #[inline]
    pub fn cache(&self) -> &TableCache<'a> {
        self.cache
    }
}
