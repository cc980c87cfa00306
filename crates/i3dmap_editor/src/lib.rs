//! # i3dmap_editor
//!
//! Rewrites a GIANTS scene/vehicle document pair so that every node the
//! vehicle document points at is referenced through a stable i3dMapping id
//! instead of a positional path.
//!
//! - [`resolve`]: duplicate name resolution with `_NNN` suffixes
//! - [`MappingTable`]: name <-> address table and the `<i3dMappings>` block
//! - [`rewrite`]: positional reference rewriting in vehicle documents
//! - [`strip_elements`]: removal of memory usage tags
//! - [`ScenePass`] / [`process_pair`]: the phases chained together
//!
//! All output is produced by splicing into the source text; nothing outside
//! the touched attribute values and the mapping block changes.

pub mod mapping;
pub mod pipeline;
pub mod report;
pub mod resolve;
pub mod rewrite;
pub mod strip;

pub use i3dmap_error::Result;
pub use mapping::{BlockLayout, MappingEntry, MappingTable};
pub use pipeline::{PairOutcome, ScenePass, VehicleOutcome, process_pair};
pub use report::{ReportEntry, ReportSummary, Site};
pub use resolve::{MAX_SUFFIX, Rename, resolve};
pub use rewrite::{BlockChange, VehicleRewrite, rewrite};
pub use strip::{StripOutcome, strip_elements};

use std::collections::HashSet;

/// Element holding the mapping entries
pub const MAPPINGS_TAG: &str = "i3dMappings";
/// One mapping entry
pub const MAPPING_TAG: &str = "i3dMapping";

/// Attributes that hold node references in vehicle documents
pub const DEFAULT_NODE_ATTRIBUTES: &[&str] = &[
    "node",
    "repr",
    "startNode",
    "endNode",
    "linkNode",
    "jointNode",
    "shaderNode",
    "rotateNode",
    "referencePoint",
    "referenceFrame",
    "index",
    "effectNode",
    "attachReferenceNode",
    "lightShaderNode",
    "driveNode",
    "realLightNode",
    "targetNode",
    "baseNode",
    "playerTriggerNode",
    "vehicleTriggerNode",
    "visibilityNode",
    "triggerNode",
    "activeNode",
    "inactiveNode",
    "numbers",
    "realLight",
];

/// Which attributes the rewriter treats as reference sites
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOptions {
    pub node_attributes: HashSet<String>,
    /// Also rewrite attributes outside `node_attributes` when their value
    /// decodes as an address
    pub rewrite_unlisted_attributes: bool,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self::new(DEFAULT_NODE_ATTRIBUTES.iter().copied(), true)
    }
}

impl RewriteOptions {
    pub fn new<I, S>(node_attributes: I, rewrite_unlisted_attributes: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            node_attributes: node_attributes.into_iter().map(Into::into).collect(),
            rewrite_unlisted_attributes,
        }
    }

    pub fn is_node_attribute(&self, name: &str) -> bool {
        self.node_attributes.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = RewriteOptions::default();
        assert!(options.is_node_attribute("node"));
        assert!(options.is_node_attribute("realLightNode"));
        assert!(!options.is_node_attribute("Node"));
        assert_eq!(options.node_attributes.len(), DEFAULT_NODE_ATTRIBUTES.len());
        assert!(options.rewrite_unlisted_attributes);
    }
}
