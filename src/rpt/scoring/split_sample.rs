use crate::sample::{
    LabelTable,
    LabelValue,
    MatchTable,
    WeightedInstanceSet,
};


/// The rows a split is scored on:
/// every label row whose subgraph has a positive weight
/// and a known match value.
#[derive(Debug, Clone)]
pub struct SplitSample<'a> {
    rows: Vec<(&'a LabelValue, f64, bool)>,
}


impl<'a> SplitSample<'a> {
    /// Join `labels`, `weights`, and `matches` on the subgraph id.
    pub fn join(
        labels: &'a LabelTable,
        weights: &WeightedInstanceSet,
        matches: &MatchTable,
    ) -> Self
    {
        let rows = labels.rows()
            .iter()
            .filter_map(|(id, value)| {
                let weight = weights.get(*id)?;
                let matched = matches.get(*id)?;
                (weight > 0f64).then_some((value, weight, matched))
            })
            .collect();
        Self { rows }
    }


    /// Iterates `(label, weight, matched)` rows.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&'a LabelValue, f64, bool)> + '_ {
        self.rows.iter().copied()
    }


    /// Returns the number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }


    /// Returns `true` if no row survived the join.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }


    /// Returns the total weight.
    #[inline]
    pub fn total_weight(&self) -> f64 {
        self.rows.iter().map(|r| r.1).sum()
    }


    /// Weighted category counts of the `(yes, no)` branches,
    /// keyed by label value in ascending order.
    pub(crate) fn category_counts(&self)
        -> std::collections::BTreeMap<String, [f64; 2]>
    {
        let mut counts = std::collections::BTreeMap::<String, [f64; 2]>::new();
        for (value, weight, matched) in self.iter() {
            let col = if matched { 0 } else { 1 };
            counts.entry(value.to_string()).or_insert([0f64; 2])[col] += weight;
        }
        counts
    }
}
