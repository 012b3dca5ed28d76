use rand::prelude::*;
use rand_distr::Normal;
use serde::{Serialize, Deserialize};

use std::fmt;

use crate::common::stat_util::{gaussian, safe_divide};
use super::discrete::SMOOTHING_FLOOR;


/// Weighted sufficient statistics of a real-valued label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ContinuousDistribution {
    weight: f64,
    sum: f64,
    sum_sq: f64,
}


impl ContinuousDistribution {
    /// Construct an empty distribution.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }


    /// Record the observation `x` with weight `weight`.
    #[inline]
    pub fn add(&mut self, x: f64, weight: f64) {
        self.weight += weight;
        self.sum += weight * x;
        self.sum_sq += weight * x * x;
    }


    /// Returns the total weight.
    #[inline]
    pub fn total(&self) -> f64 {
        self.weight
    }


    /// Weighted mean, or `0` without evidence.
    #[inline]
    pub fn mean(&self) -> f64 {
        safe_divide(self.sum, self.weight)
    }


    /// Weighted population variance.
    #[inline]
    pub fn variance(&self) -> f64 {
        let mean = self.mean();
        (safe_divide(self.sum_sq, self.weight) - mean * mean).max(0f64)
    }


    /// Weighted standard deviation.
    #[inline]
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }


    /// Gaussian density at `x` with the fitted mean and deviation.
    /// A zero deviation uses `1 / sqrt(total)` instead.
    pub fn density(&self, x: f64) -> f64 {
        let mut sigma = self.std_dev();
        if sigma == 0f64 {
            sigma = 1f64 / self.weight.max(1f64).sqrt();
        }
        gaussian(self.mean(), sigma, x)
    }


    /// Density at `x` floored at `0.01 / total`.
    pub fn smoothed_density(&self, x: f64) -> f64 {
        let floor = SMOOTHING_FLOOR / self.weight.max(1f64);
        self.density(x).max(floor)
    }


    /// Draw a value from the fitted gaussian.
    pub fn sample<R>(&self, rng: &mut R) -> f64
        where R: Rng + ?Sized
    {
        match Normal::new(self.mean(), self.std_dev()) {
            Ok(normal) => normal.sample(rng),
            Err(_) => self.mean(),
        }
    }


    /// Returns a copy whose evidence is multiplied by `weight`.
    #[inline]
    pub fn scaled(&self, weight: f64) -> Self {
        Self {
            weight: self.weight * weight,
            sum: self.sum * weight,
            sum_sq: self.sum_sq * weight,
        }
    }


    /// Returns the pooled statistics of both.
    #[inline]
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            weight: self.weight + other.weight,
            sum: self.sum + other.sum,
            sum_sq: self.sum_sq + other.sum_sq,
        }
    }
}


impl fmt::Display for ContinuousDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{mean: {:.4}, sd: {:.4}, n: {}}}",
            self.mean(), self.std_dev(), self.weight
        )
    }
}
