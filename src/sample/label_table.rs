use rand::prelude::*;
use serde::{Serialize, Deserialize};

use std::fmt;

use crate::common::SubgraphId;
use super::WeightedInstanceSet;


/// A class label value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LabelValue {
    /// A categorical value.
    Discrete(String),
    /// A real value.
    Continuous(f64),
}


impl LabelValue {
    /// Returns the categorical value, if any.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            LabelValue::Discrete(value) => Some(value),
            LabelValue::Continuous(_) => None,
        }
    }


    /// Returns the real value, if any.
    #[inline]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            LabelValue::Discrete(_) => None,
            LabelValue::Continuous(value) => Some(*value),
        }
    }


    /// Returns the value as `f64`, parsing a categorical value if needed.
    #[inline]
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            LabelValue::Discrete(value) => value.trim().parse().ok(),
            LabelValue::Continuous(value) => Some(*value),
        }
    }
}


impl From<&str> for LabelValue {
    #[inline]
    fn from(value: &str) -> Self {
        Self::Discrete(value.to_string())
    }
}


impl From<String> for LabelValue {
    #[inline]
    fn from(value: String) -> Self {
        Self::Discrete(value)
    }
}


impl From<f64> for LabelValue {
    #[inline]
    fn from(value: f64) -> Self {
        Self::Continuous(value)
    }
}


impl fmt::Display for LabelValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelValue::Discrete(value) => write!(f, "{value}"),
            LabelValue::Continuous(value) => write!(f, "{value}"),
        }
    }
}


/// Table of `(subgraph id, label value)` rows.
/// A subgraph may appear in several rows;
/// each row carries the subgraph's weight once.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelTable {
    rows: Vec<(SubgraphId, LabelValue)>,
    continuous: bool,
}


impl LabelTable {
    /// Construct an empty table.
    #[inline]
    pub fn new(continuous: bool) -> Self {
        Self { rows: Vec::new(), continuous, }
    }


    /// Append a row.
    #[inline]
    pub fn push<T>(&mut self, id: SubgraphId, value: T)
        where T: Into<LabelValue>
    {
        self.rows.push((id, value.into()));
    }


    /// Returns `true` if the label is continuous.
    #[inline]
    pub fn is_continuous(&self) -> bool {
        self.continuous
    }


    /// Returns the rows of this table.
    #[inline]
    pub fn rows(&self) -> &[(SubgraphId, LabelValue)] {
        &self.rows[..]
    }


    /// Returns the number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }


    /// Returns `true` if this table has no row.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }


    /// Returns the first label recorded for `id`.
    pub fn value_of(&self, id: SubgraphId) -> Option<&LabelValue> {
        self.rows.iter()
            .find(|(sid, _)| *sid == id)
            .map(|(_, value)| value)
    }


    /// Returns the ids of this table, deduplicated and sorted.
    pub fn subgraph_ids(&self) -> Vec<SubgraphId> {
        let mut ids = self.rows.iter()
            .map(|(id, _)| *id)
            .collect::<Vec<_>>();
        ids.sort();
        ids.dedup();
        ids
    }


    /// Returns a copy in which the labels of the rows whose subgraph
    /// is in `within` are shuffled among those rows.
    /// Other rows keep their labels.
    pub fn permuted<R>(&self, within: &WeightedInstanceSet, rng: &mut R)
        -> Self
        where R: Rng + ?Sized
    {
        let positions = self.rows.iter()
            .enumerate()
            .filter(|(_, (id, _))| within.contains(*id))
            .map(|(i, _)| i)
            .collect::<Vec<_>>();
        let mut values = positions.iter()
            .map(|&i| self.rows[i].1.clone())
            .collect::<Vec<_>>();
        values.shuffle(rng);

        let mut rows = self.rows.clone();
        for (i, value) in positions.into_iter().zip(values) {
            rows[i].1 = value;
        }
        Self { rows, continuous: self.continuous, }
    }
}
