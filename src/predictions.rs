//! Per-subgraph predicted distributions and the metrics computed on them.
use rand::prelude::*;
use tracing::warn;

use std::collections::BTreeMap;

use crate::common::SubgraphId;
use crate::common::stat_util::safe_divide;
use crate::distribution::{ProbDistribution, DiscreteDistribution};
use crate::error::{RptError, Result};
use crate::sample::{LabelTable, LabelValue};


/// Value returned by [`Predictions::zero_one_loss`]
/// when no subgraph has both a prediction and a true label.
pub const EMPTY_LOSS: f64 = -99.0;


/// Mapping from subgraph id to a predicted distribution,
/// plus the true labels used to score it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predictions {
    distributions: BTreeMap<SubgraphId, ProbDistribution>,
    true_labels: BTreeMap<SubgraphId, LabelValue>,
}


impl Predictions {
    /// Construct an empty set of predictions.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }


    /// Record `dist` for `id`.
    /// If `id` already has a prediction, the two are merged.
    pub fn set_prediction(&mut self, id: SubgraphId, dist: ProbDistribution)
        -> Result<()>
    {
        match self.distributions.get_mut(&id) {
            Some(current) => { *current = current.merge(&dist)?; },
            None => { self.distributions.insert(id, dist); },
        }
        Ok(())
    }


    /// Merge every prediction of `other` into `self`.
    /// True labels of `other` are copied as well.
    pub fn set_predictions(&mut self, other: Predictions) -> Result<()> {
        for (id, dist) in other.distributions {
            self.set_prediction(id, dist)?;
        }
        self.true_labels.extend(other.true_labels);
        Ok(())
    }


    /// Record the true label of `id`.
    #[inline]
    pub fn set_true_label<T>(&mut self, id: SubgraphId, label: T)
        where T: Into<LabelValue>
    {
        self.true_labels.insert(id, label.into());
    }


    /// Record the true labels of every row in `labels`.
    /// A later row for the same subgraph replaces an earlier one.
    pub fn set_true_labels(&mut self, labels: &LabelTable) {
        for (id, value) in labels.rows() {
            self.true_labels.insert(*id, value.clone());
        }
    }


    /// Returns the predicted distribution of `id`.
    #[inline]
    pub fn get(&self, id: SubgraphId) -> Option<&ProbDistribution> {
        self.distributions.get(&id)
    }


    /// Returns the true label of `id`.
    #[inline]
    pub fn true_label(&self, id: SubgraphId) -> Option<&LabelValue> {
        self.true_labels.get(&id)
    }


    /// Returns the number of predicted subgraphs.
    #[inline]
    pub fn len(&self) -> usize {
        self.distributions.len()
    }


    /// Returns `true` if nothing has been predicted.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.distributions.is_empty()
    }


    /// Iterates `(id, distribution)` pairs in ascending id order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (SubgraphId, &ProbDistribution)> + '_ {
        self.distributions.iter().map(|(&id, d)| (id, d))
    }


    /// Drop the prediction of `id`.
    #[inline]
    pub fn remove_prediction(&mut self, id: SubgraphId) {
        self.distributions.remove(&id);
    }


    /// Normalize every predicted distribution to sum to one.
    pub fn normalize_all(&mut self) {
        for dist in self.distributions.values_mut() {
            if let ProbDistribution::Discrete(d) = dist {
                d.normalize();
            }
        }
    }


    fn discrete_of(&self, id: SubgraphId, operation: &'static str)
        -> Result<Option<&DiscreteDistribution>>
    {
        match self.distributions.get(&id) {
            None => Ok(None),
            Some(ProbDistribution::Discrete(d)) => Ok(Some(d)),
            Some(ProbDistribution::Continuous(_)) => {
                Err(RptError::UnsupportedLabel { operation, continuous: true })
            },
        }
    }


    /// Pairs of `(true label, distribution)` for the subgraphs
    /// that have both.
    fn scored(&self) -> impl Iterator<Item = (SubgraphId, &LabelValue, &ProbDistribution)> + '_ {
        self.distributions.iter()
            .filter_map(|(id, dist)| {
                let label = self.true_labels.get(id)?;
                Some((*id, label, dist))
            })
    }


    /// Returns the most probable class of `id`.
    pub fn inferred_class(&self, id: SubgraphId) -> Result<Option<&str>> {
        let dist = self.discrete_of(id, "inferred_class")?;
        Ok(dist.and_then(|d| d.mode()))
    }


    /// Draw a class for `id` from its predicted distribution.
    pub fn sampled_class<R>(&self, id: SubgraphId, rng: &mut R)
        -> Result<Option<String>>
        where R: Rng + ?Sized
    {
        let dist = self.discrete_of(id, "sampled_class")?;
        Ok(dist.and_then(|d| d.sample(rng)).map(|s| s.to_string()))
    }


    /// Draw a class for every predicted subgraph.
    pub fn sampled_classes<R>(&self, rng: &mut R)
        -> Result<BTreeMap<SubgraphId, String>>
        where R: Rng + ?Sized
    {
        let mut classes = BTreeMap::new();
        for &id in self.distributions.keys() {
            if let Some(class) = self.sampled_class(id, rng)? {
                classes.insert(id, class);
            }
        }
        Ok(classes)
    }


    /// Fraction of scored subgraphs whose inferred class
    /// differs from the true label.
    /// Returns [`EMPTY_LOSS`] when nothing is scored.
    pub fn zero_one_loss(&self) -> Result<f64> {
        let mut total = 0usize;
        let mut errors = 0f64;
        for (_, label, dist) in self.scored() {
            let ProbDistribution::Discrete(d) = dist else {
                return Err(RptError::UnsupportedLabel {
                    operation: "zero_one_loss",
                    continuous: true,
                });
            };
            total += 1;
            let truth = label.to_string();
            if d.mode() != Some(truth.as_str()) {
                errors += 1f64;
            }
        }

        if total == 0 {
            Ok(EMPTY_LOSS)
        } else {
            Ok(errors / total as f64)
        }
    }


    /// Root-mean-square error of the predicted means.
    /// Returns `0` when nothing is scored.
    pub fn rmse(&self) -> Result<f64> {
        let mut total = 0usize;
        let mut sq = 0f64;
        for (_, label, dist) in self.scored() {
            let ProbDistribution::Continuous(c) = dist else {
                return Err(RptError::UnsupportedLabel {
                    operation: "rmse",
                    continuous: false,
                });
            };
            let Some(truth) = label.to_f64() else { continue; };
            total += 1;
            sq += (c.mean() - truth).powi(2);
        }

        if total == 0 {
            Ok(0f64)
        } else {
            Ok((sq / total as f64).sqrt())
        }
    }


    /// Sum of `ln P(true label)` over the scored subgraphs.
    /// Subgraphs whose true label has zero predicted count are skipped.
    pub fn conditional_log_likelihood(&self) -> Result<f64> {
        let mut cll = 0f64;
        for (id, label, dist) in self.scored() {
            let ProbDistribution::Discrete(d) = dist else {
                return Err(RptError::UnsupportedLabel {
                    operation: "conditional_log_likelihood",
                    continuous: true,
                });
            };
            let truth = label.to_string();
            if d.count(&truth) == 0f64 {
                warn!(subgraph = %id, label = %truth, "unknown class label");
                continue;
            }
            cll += d.probability(&truth).ln();
        }
        Ok(cll)
    }


    /// Number of scored subgraphs whose inferred class
    /// differs from the one in `other`.
    pub fn compare(&self, other: &Predictions) -> Result<f64> {
        let mut diff = 0f64;
        for (id, _, _) in self.scored() {
            let mine = self.inferred_class(id)?;
            let theirs = other.inferred_class(id)?;
            if mine != theirs { diff += 1f64; }
        }
        Ok(diff)
    }


    /// ROC points `(false positive rate, true positive rate)`
    /// for `class` against all other labels,
    /// starting at `(0, 0)`.
    /// Subgraphs are ranked by predicted probability of `class`;
    /// ties keep ascending id order.
    pub fn roc_points(&self, class: &str) -> Vec<(f64, f64)> {
        if self.true_labels.is_empty() { return Vec::new(); }

        let mut ranking = self.true_labels.iter()
            .map(|(&id, label)| {
                let prob = self.distributions.get(&id)
                    .and_then(|d| d.as_discrete())
                    .map(|d| d.probability(class));
                (id, label.to_string() == class, prob)
            })
            .collect::<Vec<_>>();
        // Subgraphs without a prediction rank last.
        ranking.sort_by(|a, b| {
            let pa = a.2.unwrap_or(f64::NEG_INFINITY);
            let pb = b.2.unwrap_or(f64::NEG_INFINITY);
            pb.total_cmp(&pa).then(a.0.cmp(&b.0))
        });

        let mut fn_ = ranking.iter().filter(|r| r.1).count() as f64;
        let mut tn = ranking.len() as f64 - fn_;
        let mut tp = 0f64;
        let mut fp = 0f64;

        let mut points = Vec::with_capacity(ranking.len() + 1);
        points.push((0f64, 0f64));
        for (_, positive, _) in ranking {
            if positive {
                tp += 1f64;
                fn_ -= 1f64;
            } else {
                fp += 1f64;
                tn -= 1f64;
            }
            points.push((safe_divide(fp, fp + tn), safe_divide(tp, tp + fn_)));
        }
        points
    }


    /// Area under the ROC curve of `class` by the trapezoid rule.
    pub fn auc(&self, class: &str) -> f64 {
        self.roc_points(class)
            .windows(2)
            .map(|w| 0.5 * (w[1].0 - w[0].0) * (w[1].1 + w[0].1))
            .sum()
    }
}
