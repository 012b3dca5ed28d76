//! Partition of a weighted instance set by a match table.
use crate::common::stat_util::safe_divide;
use crate::sample::{MatchTable, WeightedInstanceSet};


/// Share of missing-value weight sent to the yes branch
/// when no instance has a known value.
pub const DEFAULT_PCT_TRUE: f64 = 0.5;


/// Fraction of the instances with a known value that match,
/// or [`DEFAULT_PCT_TRUE`] if none is known.
/// Instances with zero weight are ignored.
pub fn pct_true(instances: &WeightedInstanceSet, matches: &MatchTable) -> f64 {
    let mut n_true = 0usize;
    let mut n_known = 0usize;
    for (id, weight) in instances.iter() {
        if weight <= 0f64 { continue; }
        if let Some(matched) = matches.get(id) {
            n_known += 1;
            if matched { n_true += 1; }
        }
    }

    if n_known == 0 {
        DEFAULT_PCT_TRUE
    } else {
        safe_divide(n_true as f64, n_known as f64)
    }
}


/// Split `instances` into `(yes, no)` sets.
///
/// An instance that matches goes to `yes` with its full weight,
/// one that does not match goes to `no`.
/// An instance absent from `matches` goes to both,
/// scaled by [`pct_true`] and `1 - pct_true` respectively.
/// A share of zero weight is left out of its set.
pub fn branch(instances: &WeightedInstanceSet, matches: &MatchTable)
    -> (WeightedInstanceSet, WeightedInstanceSet)
{
    let pct = pct_true(instances, matches);

    let mut yes = WeightedInstanceSet::new();
    let mut no = WeightedInstanceSet::new();
    for (id, weight) in instances.iter() {
        if weight <= 0f64 { continue; }
        match matches.get(id) {
            Some(true) => yes.insert(id, weight),
            Some(false) => no.insert(id, weight),
            None => {
                let w_yes = weight * pct;
                let w_no = weight * (1f64 - pct);
                if w_yes > 0f64 { yes.insert(id, w_yes); }
                if w_no > 0f64 { no.insert(id, w_no); }
            },
        }
    }
    (yes, no)
}
