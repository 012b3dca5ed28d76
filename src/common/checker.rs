//! This file defines some functions that checks some pre-conditions
//! E.g., the range of a p-value cutoff

use crate::error::{RptError, Result};


/// Check whether the p-value cutoff is in `(0, 1]`.
#[inline(always)]
pub(crate) fn check_cutoff(cutoff: f64) -> Result<()> {
    if cutoff > 0f64 && cutoff <= 1f64 {
        Ok(())
    } else {
        Err(RptError::InvalidCutoff { cutoff })
    }
}


/// Check whether the number of pseudo-samples is positive.
#[inline(always)]
pub(crate) fn check_n_samples(n_samples: usize) -> Result<()> {
    if n_samples > 0 {
        Ok(())
    } else {
        Err(RptError::InvalidSampleCount { n_samples })
    }
}


/// Check the number of folds.
#[inline(always)]
pub(crate) fn check_n_folds(n_folds: usize) -> Result<()> {
    if n_folds > 0 {
        Ok(())
    } else {
        Err(RptError::InvalidFoldCount { n_folds })
    }
}


/// Check the minimum instance weight of a splittable node.
#[inline(always)]
pub(crate) fn check_min_instances(min_instances: f64) -> Result<()> {
    if min_instances.is_finite() && min_instances >= 0f64 {
        Ok(())
    } else {
        Err(RptError::InvalidMinInstances { min_instances })
    }
}


/// Check the acceptance threshold of the randomization test.
#[inline(always)]
pub(crate) fn check_threshold(threshold: f64) -> Result<()> {
    if (0f64..=1f64).contains(&threshold) {
        Ok(())
    } else {
        Err(RptError::InvalidThreshold { threshold })
    }
}
