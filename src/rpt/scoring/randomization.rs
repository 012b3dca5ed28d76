use rayon::prelude::*;
use tracing::debug;

use std::sync::Arc;

use crate::common::checker;
use crate::error::Result;
use crate::rpt::state::ScoreContext;
use crate::sample::{LabelTable, MatchTable, WeightedInstanceSet};
use super::{Score, ScoringModule};


/// The number of pseudo-samples set as default.
pub const DEFAULT_N_SAMPLES: usize = 50;


/// Wraps another scoring module in a permutation test.
///
/// The wrapped score is computed on the true match table
/// and on `n_samples` random permutations of it
/// (labels and weights held fixed).
/// The empirical p-value is the fraction of permutations
/// that score at least as well as the true table.
///
/// # Example
/// ```no_run
/// use rptree::prelude::*;
///
/// let scoring = RandomizationPValueScore::new(ChiSquareScore::new())
///     .n_samples(100)
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct RandomizationPValueScore {
    inner: Arc<dyn ScoringModule>,
    n_samples: usize,
}


impl RandomizationPValueScore {
    /// Wrap `inner` with [`DEFAULT_N_SAMPLES`] permutations.
    pub fn new<S>(inner: S) -> Self
        where S: ScoringModule + 'static
    {
        Self { inner: Arc::new(inner), n_samples: DEFAULT_N_SAMPLES, }
    }


    /// Wrap a shared scoring module.
    pub fn from_shared(inner: Arc<dyn ScoringModule>) -> Self {
        Self { inner, n_samples: DEFAULT_N_SAMPLES, }
    }


    /// Set the number of permutations.
    /// Default value is `50`.
    pub fn n_samples(mut self, n_samples: usize) -> Result<Self> {
        checker::check_n_samples(n_samples)?;
        self.n_samples = n_samples;
        Ok(self)
    }
}


impl ScoringModule for RandomizationPValueScore {
    fn name(&self) -> &str {
        "RandomizationPValue"
    }


    fn compute(
        &self,
        labels: &LabelTable,
        weights: &WeightedInstanceSet,
        matches: &MatchTable,
        ctx: &mut ScoreContext,
    ) -> Result<Score>
    {
        let original = self.inner.compute(labels, weights, matches, ctx)?;

        let interrupt = ctx.interrupt.clone();
        let seeds = ctx.child_seeds(self.n_samples);
        let at_least_as_good = seeds.into_par_iter()
            .map(|seed| -> Result<bool> {
                let mut trial = ScoreContext::new(seed, interrupt.clone());
                trial.interrupt.check()?;
                let permuted = matches.permuted(weights, &mut trial.rng);
                let score = self.inner.compute(
                    labels, weights, &permuted, &mut trial
                )?;
                Ok(!original.is_better_than(&score)?)
            })
            .collect::<Result<Vec<bool>>>()?
            .into_iter()
            .filter(|&b| b)
            .count();

        let p = at_least_as_good as f64 / self.n_samples as f64;
        debug!(
            inner = self.inner.name(),
            original = %original,
            p,
            "randomization test finished"
        );
        Ok(Score::RandomizationPValue { p })
    }
}
