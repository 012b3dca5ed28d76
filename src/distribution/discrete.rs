use rand::prelude::*;
use serde::{Serialize, Deserialize};

use std::collections::BTreeMap;
use std::fmt;

use crate::common::stat_util::safe_divide;


/// Count used in place of a zero count by
/// [`DiscreteDistribution::smoothed_probability`].
pub const SMOOTHING_FLOOR: f64 = 0.01;


/// Weighted counts per category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscreteDistribution {
    counts: BTreeMap<String, f64>,
    total: f64,
}


impl DiscreteDistribution {
    /// Construct an empty distribution.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }


    /// Construct a distribution from `(value, count)` pairs.
    pub fn from_counts<I, S>(counts: I) -> Self
        where I: IntoIterator<Item = (S, f64)>,
              S: Into<String>,
    {
        let mut dist = Self::new();
        for (value, count) in counts {
            dist.add(value, count);
        }
        dist
    }


    /// Add `weight` to the count of `value`.
    pub fn add<S>(&mut self, value: S, weight: f64)
        where S: Into<String>
    {
        *self.counts.entry(value.into()).or_insert(0f64) += weight;
        self.total += weight;
    }


    /// Subtract `weight` from the count of `value`,
    /// dropping the value once its count reaches zero.
    pub fn remove_value(&mut self, value: &str, weight: f64) {
        let Some(count) = self.counts.get_mut(value) else { return; };
        *count -= weight;
        if *count <= 0f64 {
            self.counts.remove(value);
        }
        self.total -= weight;
    }


    /// Returns the count of `value`.
    #[inline]
    pub fn count(&self, value: &str) -> f64 {
        self.counts.get(value).copied().unwrap_or(0f64)
    }


    /// Returns the total count.
    #[inline]
    pub fn total(&self) -> f64 {
        self.total
    }


    /// Returns the number of distinct values.
    #[inline]
    pub fn len(&self) -> usize {
        self.counts.len()
    }


    /// Returns `true` if no value was observed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }


    /// Iterates `(value, count)` pairs in ascending value order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.counts.iter().map(|(v, &c)| (v.as_str(), c))
    }


    /// Returns the largest count.
    #[inline]
    pub fn max_count(&self) -> f64 {
        self.counts.values()
            .copied()
            .fold(0f64, f64::max)
    }


    /// Relative frequency of `value`.
    #[inline]
    pub fn probability(&self, value: &str) -> f64 {
        safe_divide(self.count(value), self.total)
    }


    /// Relative frequency of `value`,
    /// with a zero count replaced by [`SMOOTHING_FLOOR`].
    /// An empty distribution gives [`SMOOTHING_FLOOR`] for every value.
    #[inline]
    pub fn smoothed_probability(&self, value: &str) -> f64 {
        let mut count = self.count(value);
        if count == 0f64 { count = SMOOTHING_FLOOR; }
        let total = if self.total > 0f64 { self.total } else { 1f64 };
        count / total
    }


    /// Laplace-corrected estimate `(count + 1) / (total + #values)`.
    #[inline]
    pub fn laplace_probability(&self, value: &str) -> f64 {
        let numer = self.count(value) + 1f64;
        let denom = self.total + self.counts.len() as f64;
        numer / denom
    }


    /// Natural log of the smoothed probability.
    #[inline]
    pub fn log_probability(&self, value: &str) -> f64 {
        self.smoothed_probability(value).ln()
    }


    /// Returns the most probable value.
    /// Ties go to the lexicographically smallest value.
    pub fn mode(&self) -> Option<&str> {
        let mut best: Option<(&str, f64)> = None;
        for (value, count) in self.iter() {
            match best {
                Some((_, c)) if count <= c => {},
                _ => { best = Some((value, count)); },
            }
        }
        best.map(|(value, _)| value)
    }


    /// Draw a value with probability proportional to its count.
    pub fn sample<R>(&self, rng: &mut R) -> Option<&str>
        where R: Rng + ?Sized
    {
        if self.total <= 0f64 { return None; }
        let cutoff = rng.gen::<f64>() * self.total;
        let mut acc = 0f64;
        let mut last = None;
        for (value, count) in self.iter() {
            acc += count;
            last = Some(value);
            if acc > cutoff { return Some(value); }
        }
        last
    }


    /// Rescale the counts so that they sum to one.
    pub fn normalize(&mut self) {
        let total = self.total;
        if total <= 0f64 { return; }
        self.counts.values_mut()
            .for_each(|c| *c /= total);
        self.total = self.counts.values().sum();
    }


    /// Returns a copy whose counts are multiplied by `weight`.
    pub fn scaled(&self, weight: f64) -> Self {
        let counts = self.counts.iter()
            .map(|(v, &c)| (v.clone(), c * weight))
            .collect();
        Self { counts, total: self.total * weight, }
    }


    /// Returns a new distribution holding the counts of both.
    pub fn merge(&self, other: &Self) -> Self {
        let mut merged = self.clone();
        for (value, count) in other.iter() {
            merged.add(value, count);
        }
        merged
    }
}


impl fmt::Display for DiscreteDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = self.iter()
            .map(|(v, c)| format!("{v}: {c}"))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{{{body}}}")
    }
}
