//! Predicates deciding whether a node becomes a leaf before splitting.
use crate::common::checker;
use crate::distribution::ProbDistribution;
use crate::error::Result;
use super::state::RecursionState;


/// The minimal weight of a splittable node set as default.
pub const DEFAULT_MIN_INSTANCES: f64 = 2.0;


/// Decides whether to stop growing at a node.
pub trait StoppingModule: Send + Sync {
    /// Returns the name of this module.
    fn name(&self) -> &str;


    /// Returns `true` if the node described by `state`,
    /// whose label distribution is `dist`, must be a leaf.
    fn is_stop(&self, state: &RecursionState<'_>, dist: &ProbDistribution) -> bool;
}


/// Stops when the candidate pool is empty,
/// when the node weight is below `min_instances`,
/// when `max_depth` is reached,
/// or, if enabled, when every instance has the same label.
#[derive(Debug, Clone, Copy)]
pub struct DefaultStoppingModule {
    min_instances: f64,
    max_depth: Option<usize>,
    stop_when_pure: bool,
}


impl Default for DefaultStoppingModule {
    fn default() -> Self {
        Self {
            min_instances: DEFAULT_MIN_INSTANCES,
            max_depth: None,
            stop_when_pure: false,
        }
    }
}


impl DefaultStoppingModule {
    /// Construct a new instance with the default parameters;
    /// ```text
    /// min_instances: DEFAULT_MIN_INSTANCES == 2.0,
    /// max_depth: None,
    /// stop_when_pure: false,
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }


    /// Set the minimal total weight of a splittable node.
    pub fn min_instances(mut self, min_instances: f64) -> Result<Self> {
        checker::check_min_instances(min_instances)?;
        self.min_instances = min_instances;
        Ok(self)
    }


    /// Set the maximal depth. `None` grows without limit.
    #[inline]
    pub fn max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }


    /// Stop at nodes whose instances share a single label.
    #[inline]
    pub fn stop_when_pure(mut self, stop_when_pure: bool) -> Self {
        self.stop_when_pure = stop_when_pure;
        self
    }
}


impl StoppingModule for DefaultStoppingModule {
    fn name(&self) -> &str {
        "DefaultStopping"
    }


    fn is_stop(&self, state: &RecursionState<'_>, dist: &ProbDistribution) -> bool {
        if state.pool.is_empty() { return true; }
        if state.instances.total_weight() < self.min_instances { return true; }
        if let Some(max_depth) = self.max_depth {
            if state.depth >= max_depth { return true; }
        }
        if self.stop_when_pure {
            let pure = match dist {
                ProbDistribution::Discrete(d) => d.len() <= 1,
                ProbDistribution::Continuous(c) => c.variance() == 0f64,
            };
            if pure { return true; }
        }
        false
    }
}
