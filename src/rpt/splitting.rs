//! Selection of the best candidate split of a node.
use rand::prelude::*;
use tracing::debug;

use crate::error::Result;
use crate::sample::FeatureSetting;
use super::scoring::{Score, ScoringModule};
use super::state::{RecursionState, ScoreContext};


/// A chosen split: the feature setting, its pool index, and its score.
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    pub(crate) index: usize,
    pub(crate) setting: FeatureSetting,
    pub(crate) score: Score,
}


impl Split {
    /// Returns the chosen feature setting.
    #[inline]
    pub fn setting(&self) -> &FeatureSetting {
        &self.setting
    }


    /// Returns the score of the chosen setting.
    #[inline]
    pub fn score(&self) -> &Score {
        &self.score
    }
}


/// Chooses one split from the live candidate pool.
pub trait SplittingModule: Send + Sync {
    /// Returns the name of this module.
    fn name(&self) -> &str;


    /// Returns the best split of the node described by `state`,
    /// or `None` if the pool is empty.
    fn choose_split(
        &self,
        state: &RecursionState<'_>,
        scoring: &dyn ScoringModule,
        ctx: &mut ScoreContext,
    ) -> Result<Option<Split>>;
}


/// Scans the pool and keeps the first candidate
/// that no later candidate beats.
///
/// Ties go to the earlier candidate in scan order.
/// The scan order is a seeded shuffle of the pool,
/// or the case-insensitive signature order when `deterministic` is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSplittingModule {
    deterministic: bool,
}


impl DefaultSplittingModule {
    /// Construct a module that shuffles the pool before scanning.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }


    /// Scan in signature order instead of a shuffled order.
    #[inline]
    pub fn deterministic(mut self, deterministic: bool) -> Self {
        self.deterministic = deterministic;
        self
    }


    /// Returns `true` if the scan order is the signature order.
    #[inline]
    pub fn is_deterministic(&self) -> bool {
        self.deterministic
    }
}


impl SplittingModule for DefaultSplittingModule {
    fn name(&self) -> &str {
        "DefaultSplitting"
    }


    fn choose_split(
        &self,
        state: &RecursionState<'_>,
        scoring: &dyn ScoringModule,
        ctx: &mut ScoreContext,
    ) -> Result<Option<Split>>
    {
        let mut candidates = state.pool.available().collect::<Vec<_>>();
        if candidates.is_empty() { return Ok(None); }

        if self.deterministic {
            candidates.sort_by(|a, b| a.1.deterministic_cmp(b.1));
        } else {
            candidates.shuffle(&mut ctx.rng);
        }

        let mut best: Option<Split> = None;
        for (index, setting) in candidates {
            let matches = state.cache.match_table(setting)?;
            let score = scoring.compute(
                state.labels, &state.instances, &matches, ctx
            )?;
            debug!(
                depth = state.depth.get(),
                setting = setting.signature(),
                score = %score,
                "scored candidate"
            );

            let replace = match best {
                None => true,
                Some(ref b) => score.is_better_than(&b.score)?,
            };
            if replace {
                best = Some(Split { index, setting: setting.clone(), score, });
            }
        }
        Ok(best)
    }
}
