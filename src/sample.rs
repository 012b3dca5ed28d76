//! Tables consumed by the tree engine:
//! containers of subgraphs, weighted instance sets,
//! label tables, match tables, and the feature settings
//! that name candidate binary tests.

// Provides the container of subgraphs.
pub(crate) mod container;
// Provides the weighted instance set.
pub(crate) mod weighted_set;
// Provides the label table.
pub(crate) mod label_table;
// Provides the match table.
pub(crate) mod match_table;
// Provides the feature setting descriptor.
pub(crate) mod feature_setting;
// Provides the traits for label sources and feature catalogs.
pub(crate) mod source;
// Provides in-memory sources backed by `polars` frames.
pub(crate) mod memory_source;


pub use container::Container;
pub use weighted_set::WeightedInstanceSet;
pub use label_table::{LabelTable, LabelValue};
pub use match_table::MatchTable;
pub use feature_setting::FeatureSetting;
pub use source::{LabelSource, FeatureCatalog};
pub use memory_source::{AttributeLabels, MatchTableCatalog};
