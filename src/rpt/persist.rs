//! Model serialization and deserialization via `serde_json`.
use serde::{Serialize, Deserialize};
use tracing::{debug, info, instrument};

use std::path::Path;

use crate::error::{RptError, Result};
use super::builder::RptConfig;
use super::model::Rpt;
use super::node::RptNode;


/// Current format version.
const FORMAT_VERSION: u32 = 1;


/// Versioned envelope for the serialized model.
#[derive(Serialize)]
struct ModelEnvelope<'a> {
    format_version: u32,
    class_label: &'a str,
    n_leaves: usize,
    config: &'a RptConfig,
    root: &'a RptNode,
}


/// Owned counterpart of [`ModelEnvelope`].
#[derive(Deserialize)]
struct LoadedEnvelope {
    format_version: u32,
    class_label: String,
    n_leaves: usize,
    config: RptConfig,
    root: RptNode,
}


impl Rpt {
    /// Returns the learned model as a JSON document.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`RptError::Untrained`] | no tree is learned |
    /// | [`RptError::SerializeModel`] | JSON encoding failed |
    pub fn to_json(&self) -> Result<String> {
        let (config, class_label, root) = self.parts()?;
        let envelope = ModelEnvelope {
            format_version: FORMAT_VERSION,
            class_label,
            n_leaves: root.leaf_count(),
            config,
            root,
        };
        serde_json::to_string_pretty(&envelope)
            .map_err(|e| RptError::SerializeModel { source: e })
    }


    /// Save the learned model to a JSON file.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`RptError::Untrained`] | no tree is learned |
    /// | [`RptError::SerializeModel`] | JSON encoding failed |
    /// | [`RptError::WriteModel`] | file write failed |
    #[instrument(skip(self), fields(path = %path.as_ref().display()))]
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = self.to_json()?;

        std::fs::write(path, json.as_bytes()).map_err(|e| RptError::WriteModel {
            path: path.to_path_buf(),
            source: e,
        })?;

        info!(size_bytes = json.len(), "model saved");
        Ok(())
    }


    /// Load a model from a JSON file.
    ///
    /// Checks the format version and returns an error on mismatch.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`RptError::ReadModel`] | file read failed |
    /// | [`RptError::DeserializeModel`] | JSON decoding failed |
    /// | [`RptError::IncompatibleModelVersion`] | format version mismatch |
    #[instrument(fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let bytes = std::fs::read(path).map_err(|e| RptError::ReadModel {
            path: path.to_path_buf(),
            source: e,
        })?;

        let envelope: LoadedEnvelope = serde_json::from_slice(&bytes)
            .map_err(|e| RptError::DeserializeModel {
                path: path.to_path_buf(),
                source: e,
            })?;

        if envelope.format_version != FORMAT_VERSION {
            return Err(RptError::IncompatibleModelVersion {
                expected: FORMAT_VERSION,
                found: envelope.format_version,
                path: path.to_path_buf(),
            });
        }

        debug!(
            class_label = %envelope.class_label,
            n_leaves = envelope.n_leaves,
            "model loaded"
        );
        Rpt::from_parts(envelope.config, envelope.class_label, envelope.root)
    }
}
