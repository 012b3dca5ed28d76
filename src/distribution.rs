//! Probability distributions fitted from weighted label tables.

// Provides the categorical distribution.
pub(crate) mod discrete;
// Provides the gaussian sufficient statistics.
pub(crate) mod continuous;


pub use discrete::DiscreteDistribution;
pub use continuous::ContinuousDistribution;


use serde::{Serialize, Deserialize};

use std::fmt;

use crate::error::{RptError, Result};
use crate::sample::{LabelTable, WeightedInstanceSet};


/// A distribution over class label values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProbDistribution {
    /// Weighted category counts.
    Discrete(DiscreteDistribution),
    /// Weighted sufficient statistics of a real label.
    Continuous(ContinuousDistribution),
}


impl ProbDistribution {
    /// Fit a distribution from `labels`, weighting every row
    /// by the weight its subgraph has in `weights`.
    /// Rows whose subgraph is not in `weights` are ignored.
    /// A subgraph listed in several rows contributes once per row.
    pub fn estimate(labels: &LabelTable, weights: &WeightedInstanceSet)
        -> Self
    {
        if labels.is_continuous() {
            let mut dist = ContinuousDistribution::new();
            for (id, value) in labels.rows() {
                let (Some(w), Some(x)) = (weights.get(*id), value.to_f64())
                    else { continue; };
                if w > 0f64 { dist.add(x, w); }
            }
            Self::Continuous(dist)
        } else {
            let mut dist = DiscreteDistribution::new();
            for (id, value) in labels.rows() {
                let Some(w) = weights.get(*id) else { continue; };
                if w > 0f64 { dist.add(value.to_string(), w); }
            }
            Self::Discrete(dist)
        }
    }


    /// Returns an empty distribution of the given kind.
    #[inline]
    pub fn empty(continuous: bool) -> Self {
        if continuous {
            Self::Continuous(ContinuousDistribution::new())
        } else {
            Self::Discrete(DiscreteDistribution::new())
        }
    }


    /// Returns `true` if this is a continuous distribution.
    #[inline]
    pub fn is_continuous(&self) -> bool {
        matches!(self, Self::Continuous(_))
    }


    /// Returns the total weight of evidence.
    #[inline]
    pub fn total(&self) -> f64 {
        match self {
            Self::Discrete(d) => d.total(),
            Self::Continuous(c) => c.total(),
        }
    }


    /// Returns the categorical distribution, if this is one.
    #[inline]
    pub fn as_discrete(&self) -> Option<&DiscreteDistribution> {
        match self {
            Self::Discrete(d) => Some(d),
            Self::Continuous(_) => None,
        }
    }


    /// Returns the continuous distribution, if this is one.
    #[inline]
    pub fn as_continuous(&self) -> Option<&ContinuousDistribution> {
        match self {
            Self::Discrete(_) => None,
            Self::Continuous(c) => Some(c),
        }
    }


    /// Combine the evidence of two distributions of the same kind.
    pub fn merge(&self, other: &Self) -> Result<Self> {
        match (self, other) {
            (Self::Discrete(a), Self::Discrete(b))
                => Ok(Self::Discrete(a.merge(b))),
            (Self::Continuous(a), Self::Continuous(b))
                => Ok(Self::Continuous(a.merge(b))),
            _ => Err(RptError::DistributionMismatch),
        }
    }


    /// Returns a copy whose evidence is multiplied by `weight`.
    #[inline]
    pub fn scaled(&self, weight: f64) -> Self {
        match self {
            Self::Discrete(d) => Self::Discrete(d.scaled(weight)),
            Self::Continuous(c) => Self::Continuous(c.scaled(weight)),
        }
    }
}


impl fmt::Display for ProbDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Discrete(d) => write!(f, "{d}"),
            Self::Continuous(c) => write!(f, "{c}"),
        }
    }
}
