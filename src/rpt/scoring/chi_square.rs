use crate::common::stat_util;
use crate::error::{RptError, Result};
use crate::rpt::state::ScoreContext;
use crate::sample::{LabelTable, MatchTable, WeightedInstanceSet};
use super::{Score, ScoringModule, SplitSample};


/// Scores a split by the G-statistic of the
/// `label value × match` contingency table.
/// The p-value uses `#label values - 1` degrees of freedom.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChiSquareScore;


impl ChiSquareScore {
    /// Construct a new instance of `ChiSquareScore`.
    #[inline]
    pub fn new() -> Self {
        Self
    }


    /// Score a contingency table given as `[yes, no]` rows,
    /// one row per label value.
    pub fn score_table(table: &[Vec<f64>]) -> Score {
        let g = stat_util::g_statistic(table);
        let dof = table.len().saturating_sub(1);
        let p = stat_util::chi_square_p(g, dof);
        Score::ChiSquare { g, p }
    }
}


impl ScoringModule for ChiSquareScore {
    fn name(&self) -> &str {
        "ChiSquare"
    }


    fn compute(
        &self,
        labels: &LabelTable,
        weights: &WeightedInstanceSet,
        matches: &MatchTable,
        _ctx: &mut ScoreContext,
    ) -> Result<Score>
    {
        if labels.is_continuous() {
            return Err(RptError::UnsupportedLabel {
                operation: "chi-square scoring",
                continuous: true,
            });
        }

        let sample = SplitSample::join(labels, weights, matches);
        let table = sample.category_counts()
            .into_values()
            .map(|counts| counts.to_vec())
            .collect::<Vec<_>>();
        Ok(Self::score_table(&table))
    }
}
