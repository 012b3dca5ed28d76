//! Acceptance tests applied to the split chosen at a node.
use rayon::prelude::*;
use tracing::debug;

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::common::checker;
use crate::error::Result;
use super::scoring::{Score, ScoringModule};
use super::splitting::Split;
use super::state::{RecursionState, ScoreContext};


/// The p-value cutoff set as default.
pub const DEFAULT_P_VALUE: f64 = 0.05;
/// The number of label permutations set as default.
pub const DEFAULT_MAX_SAMPLES: usize = 50;
/// The share of permutations the chosen split must beat, set as default.
pub const DEFAULT_THRESHOLD: f64 = 0.9;


/// Decides whether a chosen split is accepted or the node becomes a leaf.
pub trait SignificanceModule: Send + Sync {
    /// Returns the name of this module.
    fn name(&self) -> &str;


    /// Returns `true` if `split` is accepted at the node of `state`.
    fn is_significant(
        &self,
        split: &Split,
        state: &RecursionState<'_>,
        scoring: &dyn ScoringModule,
        ctx: &mut ScoreContext,
    ) -> Result<bool>;
}


/// Accepts a split iff its score is significant at `p_value`.
#[derive(Debug, Clone, Copy)]
pub struct DefaultSignificanceModule {
    p_value: f64,
}


impl Default for DefaultSignificanceModule {
    fn default() -> Self {
        Self { p_value: DEFAULT_P_VALUE }
    }
}


impl DefaultSignificanceModule {
    /// Construct a module with the cutoff `p_value`.
    pub fn new(p_value: f64) -> Result<Self> {
        checker::check_cutoff(p_value)?;
        Ok(Self { p_value })
    }


    /// Returns the cutoff.
    #[inline]
    pub fn p_value(&self) -> f64 {
        self.p_value
    }
}


impl SignificanceModule for DefaultSignificanceModule {
    fn name(&self) -> &str {
        "DefaultSignificance"
    }


    fn is_significant(
        &self,
        split: &Split,
        _state: &RecursionState<'_>,
        _scoring: &dyn ScoringModule,
        _ctx: &mut ScoreContext,
    ) -> Result<bool>
    {
        Ok(split.score.is_significant(self.p_value))
    }
}


/// Accepts a split only if it is significant at `p_value`
/// and survives a label-permutation test.
///
/// For each of `max_samples` permutations of the labels
/// of the node's instances, every live candidate is re-scored
/// and the best permuted score is compared with the chosen score.
/// The split is rejected as soon as the permuted best wins
/// more than `max_samples * (1 - threshold)` times.
#[derive(Debug, Clone, Copy)]
pub struct RandomizationSignificanceModule {
    p_value: f64,
    max_samples: usize,
    threshold: f64,
}


impl Default for RandomizationSignificanceModule {
    fn default() -> Self {
        Self {
            p_value: DEFAULT_P_VALUE,
            max_samples: DEFAULT_MAX_SAMPLES,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}


impl RandomizationSignificanceModule {
    /// Construct a module with the default parameters;
    /// ```text
    /// p_value: DEFAULT_P_VALUE == 0.05,
    /// max_samples: DEFAULT_MAX_SAMPLES == 50,
    /// threshold: DEFAULT_THRESHOLD == 0.9,
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }


    /// Set the p-value cutoff of the chosen score.
    pub fn p_value(mut self, p_value: f64) -> Result<Self> {
        checker::check_cutoff(p_value)?;
        self.p_value = p_value;
        Ok(self)
    }


    /// Set the number of permutations.
    pub fn max_samples(mut self, max_samples: usize) -> Result<Self> {
        checker::check_n_samples(max_samples)?;
        self.max_samples = max_samples;
        Ok(self)
    }


    /// Set the share of permutations the chosen split must beat.
    pub fn threshold(mut self, threshold: f64) -> Result<Self> {
        checker::check_threshold(threshold)?;
        self.threshold = threshold;
        Ok(self)
    }


    #[inline]
    fn max_losses(&self) -> f64 {
        let max = self.max_samples as f64;
        max - max * self.threshold
    }
}


impl SignificanceModule for RandomizationSignificanceModule {
    fn name(&self) -> &str {
        "RandomizationSignificance"
    }


    fn is_significant(
        &self,
        split: &Split,
        state: &RecursionState<'_>,
        scoring: &dyn ScoringModule,
        ctx: &mut ScoreContext,
    ) -> Result<bool>
    {
        if !split.score.is_significant(self.p_value) { return Ok(false); }

        let max_losses = self.max_losses();
        let losses = AtomicUsize::new(0);
        let interrupt = ctx.interrupt.clone();
        let seeds = ctx.child_seeds(self.max_samples);

        seeds.into_par_iter()
            .try_for_each(|seed| -> Result<()> {
                // Already rejected.
                if losses.load(Ordering::Relaxed) as f64 > max_losses {
                    return Ok(());
                }

                let mut trial = ScoreContext::new(seed, interrupt.clone());
                trial.interrupt.check()?;
                let labels = state.labels.permuted(
                    &state.instances, &mut trial.rng
                );

                let mut best: Option<Score> = None;
                for (_, setting) in state.pool.available() {
                    let matches = state.cache.match_table(setting)?;
                    let score = scoring.compute(
                        &labels, &state.instances, &matches, &mut trial
                    )?;
                    let replace = match best {
                        None => true,
                        Some(ref b) => score.is_better_than(b)?,
                    };
                    if replace { best = Some(score); }
                }

                if let Some(best) = best {
                    if best.is_better_than(&split.score)? {
                        losses.fetch_add(1, Ordering::Relaxed);
                    }
                }
                Ok(())
            })?;

        let losses = losses.into_inner();
        let accepted = losses as f64 <= max_losses;
        debug!(
            setting = split.setting.signature(),
            losses,
            accepted,
            "randomization significance test finished"
        );
        Ok(accepted)
    }
}

