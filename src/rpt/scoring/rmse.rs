use crate::common::stat_util::safe_divide;
use crate::error::{RptError, Result};
use crate::rpt::state::ScoreContext;
use crate::sample::{LabelTable, MatchTable, WeightedInstanceSet};
use super::{Score, ScoringModule, SplitSample};


/// Scores a split of a real-valued label by the error
/// of predicting each branch by its weighted mean.
#[derive(Debug, Clone, Copy, Default)]
pub struct RmseScore;


impl RmseScore {
    /// Construct a new instance of `RmseScore`.
    #[inline]
    pub fn new() -> Self {
        Self
    }
}


#[derive(Default)]
struct Moments {
    weight: f64,
    sum: f64,
}


impl Moments {
    #[inline]
    fn add(&mut self, x: f64, w: f64) {
        self.weight += w;
        self.sum += w * x;
    }


    #[inline]
    fn mean(&self) -> f64 {
        safe_divide(self.sum, self.weight)
    }
}


/// Largest gap between the weighted empirical CDF of `branch`
/// and that of `pool`.
fn ks_distance(branch: &[(f64, f64)], pool: &[(f64, f64)]) -> f64 {
    let w_branch = branch.iter().map(|r| r.1).sum::<f64>();
    let w_pool = pool.iter().map(|r| r.1).sum::<f64>();
    if w_branch <= 0f64 || w_pool <= 0f64 { return 0f64; }

    let mut d = 0f64;
    let (mut i, mut j) = (0, 0);
    let (mut cdf_branch, mut cdf_pool) = (0f64, 0f64);
    while j < pool.len() {
        let x = pool[j].0;
        while j < pool.len() && pool[j].0 <= x {
            cdf_pool += pool[j].1;
            j += 1;
        }
        while i < branch.len() && branch[i].0 <= x {
            cdf_branch += branch[i].1;
            i += 1;
        }
        let gap = (cdf_branch / w_branch - cdf_pool / w_pool).abs();
        d = d.max(gap);
    }
    d
}


impl ScoringModule for RmseScore {
    fn name(&self) -> &str {
        "RMSE"
    }


    fn compute(
        &self,
        labels: &LabelTable,
        weights: &WeightedInstanceSet,
        matches: &MatchTable,
        _ctx: &mut ScoreContext,
    ) -> Result<Score>
    {
        if !labels.is_continuous() {
            return Err(RptError::UnsupportedLabel {
                operation: "rmse scoring",
                continuous: false,
            });
        }

        let sample = SplitSample::join(labels, weights, matches);
        let mut yes = Vec::new();
        let mut no = Vec::new();
        for (value, weight, matched) in sample.iter() {
            let Some(x) = value.to_f64() else { continue; };
            if matched { yes.push((x, weight)); } else { no.push((x, weight)); }
        }

        let mut m_yes = Moments::default();
        let mut m_no = Moments::default();
        let mut m_all = Moments::default();
        yes.iter().for_each(|&(x, w)| { m_yes.add(x, w); m_all.add(x, w); });
        no.iter().for_each(|&(x, w)| { m_no.add(x, w); m_all.add(x, w); });

        let total = m_all.weight;
        let sq_err = |rows: &[(f64, f64)], mean: f64| {
            rows.iter().map(|&(x, w)| w * (x - mean).powi(2)).sum::<f64>()
        };

        let mean_all = m_all.mean();
        let no_split = sq_err(&yes, mean_all) + sq_err(&no, mean_all);
        let split = sq_err(&yes, m_yes.mean()) + sq_err(&no, m_no.mean());

        let rmse_no_split = safe_divide(no_split, total).sqrt();
        let rmse = safe_divide(split, total).sqrt();

        let mut pool = yes.iter().chain(no.iter()).copied().collect::<Vec<_>>();
        pool.sort_by(|a, b| a.0.total_cmp(&b.0));
        yes.sort_by(|a, b| a.0.total_cmp(&b.0));
        no.sort_by(|a, b| a.0.total_cmp(&b.0));
        let d = ks_distance(&yes, &pool).max(ks_distance(&no, &pool));
        let d_hat = safe_divide(2f64, total).sqrt();

        Ok(Score::Rmse { rmse, rmse_no_split, d, d_hat })
    }
}
