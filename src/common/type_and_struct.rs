use serde::{Serialize, Deserialize};
use std::ops;
use std::cmp;
use std::fmt;


/// Identifier of a subgraph, the unit of training and test instances.
/// This is just a wrapper for `u64`.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug,
    Serialize, Deserialize,
)]
#[repr(transparent)]
#[serde(transparent)]
pub struct SubgraphId(pub u64);


impl From<u64> for SubgraphId {
    #[inline]
    fn from(id: u64) -> Self {
        Self(id)
    }
}


impl fmt::Display for SubgraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}


/// Struct `Depth` counts the edges from the root to a node.
/// This is just a wrapper for `usize`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default)]
#[repr(transparent)]
pub struct Depth(usize);


impl Depth {
    /// The depth of the root node.
    pub const ROOT: Self = Self(0);


    /// Returns the wrapped value.
    #[inline]
    pub fn get(self) -> usize {
        self.0
    }
}


impl From<usize> for Depth {
    #[inline]
    fn from(depth: usize) -> Self {
        Self(depth)
    }
}


impl ops::Add<usize> for Depth {
    type Output = Self;
    #[inline]
    fn add(self, other: usize) -> Self::Output {
        Self(self.0 + other)
    }
}


impl cmp::PartialEq<usize> for Depth {
    #[inline]
    fn eq(&self, rhs: &usize) -> bool {
        self.0.eq(rhs)
    }
}


impl cmp::PartialOrd<usize> for Depth {
    #[inline]
    fn partial_cmp(&self, other: &usize) -> Option<cmp::Ordering> {
        self.0.partial_cmp(other)
    }
}
