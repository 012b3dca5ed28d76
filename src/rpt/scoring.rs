//! Pluggable statistics that rank candidate splits.

// Provides the comparable score value.
pub(crate) mod score;
// Provides the joined label/weight/match rows a score is computed on.
pub(crate) mod split_sample;
// Provides the G-statistic score.
pub(crate) mod chi_square;
// Provides the Gini impurity-reduction score.
pub(crate) mod gini;
// Provides the information-gain score.
pub(crate) mod quinlan_info;
// Provides the root-mean-square-error score.
pub(crate) mod rmse;
// Provides the permutation-test wrapper.
pub(crate) mod randomization;


pub use score::Score;
pub use split_sample::SplitSample;
pub use chi_square::ChiSquareScore;
pub use gini::GiniScore;
pub use quinlan_info::QuinlanInfoScore;
pub use rmse::RmseScore;
pub use randomization::RandomizationPValueScore;


use crate::error::Result;
use crate::sample::{LabelTable, MatchTable, WeightedInstanceSet};
use super::state::ScoreContext;


/// A statistic comparing the predictive value of candidate splits.
pub trait ScoringModule: Send + Sync {
    /// Returns the name of this module.
    fn name(&self) -> &str;


    /// Score the split of `weights` by `matches`
    /// for predicting `labels`.
    fn compute(
        &self,
        labels: &LabelTable,
        weights: &WeightedInstanceSet,
        matches: &MatchTable,
        ctx: &mut ScoreContext,
    ) -> Result<Score>;
}
