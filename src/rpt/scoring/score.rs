use serde::{Serialize, Deserialize};

use std::fmt;

use crate::error::{RptError, Result};


/// The value produced by a [`ScoringModule`](super::ScoringModule).
/// Only scores of the same kind are comparable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Score {
    /// G-statistic and its chi-square p-value.
    ChiSquare {
        /// The G-statistic.
        g: f64,
        /// Upper-tail p-value of `g`.
        p: f64,
    },
    /// Reduction of Gini impurity.
    Gini {
        /// Impurity of the parent minus the weighted child impurity.
        gain: f64,
    },
    /// Reduction of entropy, in nats.
    QuinlanInfo {
        /// Entropy of the parent minus the weighted child entropy.
        gain: f64,
    },
    /// Error of predicting each branch by its weighted mean.
    Rmse {
        /// RMSE with the split.
        rmse: f64,
        /// RMSE of predicting the pooled mean.
        rmse_no_split: f64,
        /// Largest weighted KS distance between a branch and the pool.
        d: f64,
        /// Scale of `d` expected without an effect, `sqrt(2 / n)`.
        d_hat: f64,
    },
    /// Empirical p-value of a permutation test.
    RandomizationPValue {
        /// Fraction of permuted trials scoring at least as well.
        p: f64,
    },
}


impl Score {
    /// Returns the name of this kind of score.
    pub fn kind(&self) -> &'static str {
        match self {
            Score::ChiSquare { .. } => "chi-square",
            Score::Gini { .. } => "gini",
            Score::QuinlanInfo { .. } => "quinlan-info",
            Score::Rmse { .. } => "rmse",
            Score::RandomizationPValue { .. } => "randomization-p-value",
        }
    }


    /// Returns `true` if `self` ranks strictly above `other`.
    ///
    /// * chi-square: lower p, ties broken by higher G.
    /// * gini, quinlan-info: higher gain.
    /// * rmse: lower RMSE.
    /// * randomization: lower empirical p.
    pub fn is_better_than(&self, other: &Score) -> Result<bool> {
        let better = match (self, other) {
            (Score::ChiSquare { g, p }, Score::ChiSquare { g: og, p: op }) => {
                p < op || (p == op && g > og)
            },
            (Score::Gini { gain }, Score::Gini { gain: o }) => gain > o,
            (Score::QuinlanInfo { gain }, Score::QuinlanInfo { gain: o }) => gain > o,
            (Score::Rmse { rmse, .. }, Score::Rmse { rmse: o, .. }) => rmse < o,
            (
                Score::RandomizationPValue { p },
                Score::RandomizationPValue { p: o },
            ) => p < o,
            _ => {
                return Err(RptError::ScoreMismatch {
                    expected: self.kind(),
                    found: other.kind(),
                });
            },
        };
        Ok(better)
    }


    /// Returns `true` if the split should be accepted at `cutoff`.
    ///
    /// * chi-square, randomization: `p < cutoff`.
    /// * gini, quinlan-info: always.
    /// * rmse: the split lowers the RMSE.
    pub fn is_significant(&self, cutoff: f64) -> bool {
        match self {
            Score::ChiSquare { p, .. } => *p < cutoff,
            Score::Gini { .. } | Score::QuinlanInfo { .. } => true,
            Score::Rmse { rmse, rmse_no_split, .. } => rmse < rmse_no_split,
            Score::RandomizationPValue { p } => *p < cutoff,
        }
    }


    /// Returns the main statistic of this score.
    pub fn value(&self) -> f64 {
        match self {
            Score::ChiSquare { g, .. } => *g,
            Score::Gini { gain } | Score::QuinlanInfo { gain } => *gain,
            Score::Rmse { rmse, .. } => *rmse,
            Score::RandomizationPValue { p } => *p,
        }
    }


    /// Returns the p-value, if this kind of score has one.
    pub fn significance(&self) -> Option<f64> {
        match self {
            Score::ChiSquare { p, .. } | Score::RandomizationPValue { p }
                => Some(*p),
            _ => None,
        }
    }
}


impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Score::ChiSquare { g, p } => write!(f, "G = {g:.4}, p = {p:.4}"),
            Score::Gini { gain } => write!(f, "gini gain = {gain:.4}"),
            Score::QuinlanInfo { gain } => write!(f, "info gain = {gain:.4}"),
            Score::Rmse { rmse, rmse_no_split, d, d_hat } => write!(
                f,
                "rmse = {rmse:.4} (no split {rmse_no_split:.4}), d = {d:.4}, dhat = {d_hat:.4}"
            ),
            Score::RandomizationPValue { p } => write!(f, "empirical p = {p:.4}"),
        }
    }
}
