use crate::common::stat_util::safe_divide;
use crate::error::{RptError, Result};
use crate::rpt::state::ScoreContext;
use crate::sample::{LabelTable, MatchTable, WeightedInstanceSet};
use super::{Score, ScoringModule, SplitSample};


/// Scores a split by the reduction of Gini impurity.
#[derive(Debug, Clone, Copy, Default)]
pub struct GiniScore;


impl GiniScore {
    /// Construct a new instance of `GiniScore`.
    #[inline]
    pub fn new() -> Self {
        Self
    }
}


#[inline]
fn gini<I>(counts: I) -> f64
    where I: Iterator<Item = f64> + Clone
{
    let total = counts.clone().sum::<f64>();
    if total <= 0f64 { return 0f64; }
    1f64 - counts.map(|c| (c / total).powi(2)).sum::<f64>()
}


impl ScoringModule for GiniScore {
    fn name(&self) -> &str {
        "Gini"
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
                operation: "gini scoring",
                continuous: true,
            });
        }

        let counts = SplitSample::join(labels, weights, matches)
            .category_counts()
            .into_values()
            .collect::<Vec<_>>();

        let yes = counts.iter().map(|c| c[0]);
        let no = counts.iter().map(|c| c[1]);
        let all = counts.iter().map(|c| c[0] + c[1]);

        let w_yes = yes.clone().sum::<f64>();
        let w_no = no.clone().sum::<f64>();
        let total = w_yes + w_no;

        let children = safe_divide(w_yes, total) * gini(yes)
            + safe_divide(w_no, total) * gini(no);
        let gain = gini(all) - children;
        Ok(Score::Gini { gain })
    }
}
