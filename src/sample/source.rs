//! Seams to the external data store.
use crate::error::Result;
use super::{Container, FeatureSetting, LabelTable, MatchTable};


/// Supplies the class label of the subgraphs in a container.
pub trait LabelSource: Send + Sync {
    /// Returns the name of the label attribute.
    fn name(&self) -> &str;


    /// Returns `true` if the label is real-valued.
    fn is_continuous(&self) -> bool;


    /// Returns the `(subgraph id, label)` rows for `container`.
    fn label_table(&self, container: &Container) -> Result<LabelTable>;
}


/// Enumerates candidate feature settings
/// and materializes their match tables.
pub trait FeatureCatalog: Send + Sync {
    /// Returns every feature setting applicable to `container`.
    fn feature_settings(&self, container: &Container)
        -> Result<Vec<FeatureSetting>>;


    /// Returns the match table of `setting`
    /// restricted to the subgraphs of `container`.
    fn match_table(&self, container: &Container, setting: &FeatureSetting)
        -> Result<MatchTable>;
}
