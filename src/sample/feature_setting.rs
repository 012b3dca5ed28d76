use serde::{Serialize, Deserialize};

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};


/// An immutable descriptor of a candidate binary test:
/// a data source, an aggregation function over it,
/// an optional value filter, and a threshold.
///
/// Identity is the canonical signature
/// `aggregator([source]=filter)>=threshold`,
/// which keys the match-table cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSetting {
    source: String,
    aggregator: String,
    filter: Option<String>,
    threshold: String,
    signature: String,
}


impl FeatureSetting {
    /// Construct a new feature setting.
    pub fn new<S, A, T>(source: S, aggregator: A, threshold: T) -> Self
        where S: Into<String>,
              A: Into<String>,
              T: ToString,
    {
        let source = source.into();
        let aggregator = aggregator.into();
        let threshold = threshold.to_string();
        let signature = Self::signature_of(
            &source, &aggregator, None, &threshold
        );
        Self { source, aggregator, filter: None, threshold, signature, }
    }


    /// Restrict the aggregation to source values equal to `value`.
    pub fn filter<V>(mut self, value: V) -> Self
        where V: ToString
    {
        let filter = value.to_string();
        self.signature = Self::signature_of(
            &self.source, &self.aggregator, Some(&filter), &self.threshold
        );
        self.filter = Some(filter);
        self
    }


    fn signature_of(
        source: &str,
        aggregator: &str,
        filter: Option<&str>,
        threshold: &str,
    ) -> String
    {
        match filter {
            Some(value) => format!("{aggregator}([{source}]={value})>={threshold}"),
            None => format!("{aggregator}([{source}])>={threshold}"),
        }
    }


    /// Returns the data source.
    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }


    /// Returns the aggregation function.
    #[inline]
    pub fn aggregator(&self) -> &str {
        &self.aggregator
    }


    /// Returns the value filter, if any.
    #[inline]
    pub fn value_filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }


    /// Returns the threshold.
    #[inline]
    pub fn threshold(&self) -> &str {
        &self.threshold
    }


    /// Returns the canonical signature.
    #[inline]
    pub fn signature(&self) -> &str {
        &self.signature
    }


    /// Ordering used for deterministic candidate scans:
    /// case-insensitive by signature, then by the exact signature.
    pub(crate) fn deterministic_cmp(&self, other: &Self) -> Ordering {
        let a = self.signature.to_lowercase();
        let b = other.signature.to_lowercase();
        a.cmp(&b).then_with(|| self.signature.cmp(&other.signature))
    }
}


impl PartialEq for FeatureSetting {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.signature == other.signature
    }
}


impl Eq for FeatureSetting {}


impl Hash for FeatureSetting {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.signature.hash(state);
    }
}


impl fmt::Display for FeatureSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.signature)
    }
}
