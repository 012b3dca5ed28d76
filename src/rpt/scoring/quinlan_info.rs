use crate::common::stat_util::{safe_divide, safe_log};
use crate::error::{RptError, Result};
use crate::rpt::state::ScoreContext;
use crate::sample::{LabelTable, MatchTable, WeightedInstanceSet};
use super::{Score, ScoringModule, SplitSample};


/// Scores a split by its information gain in nats.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuinlanInfoScore;


impl QuinlanInfoScore {
    /// Construct a new instance of `QuinlanInfoScore`.
    #[inline]
    pub fn new() -> Self {
        Self
    }
}


#[inline]
fn entropy<I>(counts: I) -> f64
    where I: Iterator<Item = f64> + Clone
{
    let total = counts.clone().sum::<f64>();
    if total <= 0f64 { return 0f64; }
    -counts.map(|c| {
            let p = c / total;
            p * safe_log(p)
        })
        .sum::<f64>()
}


impl ScoringModule for QuinlanInfoScore {
    fn name(&self) -> &str {
        "QuinlanInfo"
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
                operation: "information-gain scoring",
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

        let children = safe_divide(w_yes, total) * entropy(yes)
            + safe_divide(w_no, total) * entropy(no);
        let gain = entropy(all) - children;
        Ok(Score::QuinlanInfo { gain })
    }
}
