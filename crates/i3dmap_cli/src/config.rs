//! Run configuration, optionally loaded from a JSON file

use i3dmap_editor::{DEFAULT_NODE_ATTRIBUTES, RewriteOptions};
use i3dmap_error::{I3dMapError, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Debug-only elements the GIANTS editor writes into vehicle XML files
pub const DEFAULT_MEMORY_TAGS: &[&str] = &[
    "vertexBufferMemoryUsage",
    "indexBufferMemoryUsage",
    "textureMemoryUsage",
    "audioMemoryUsage",
    "instanceVertexBufferMemoryUsage",
    "instanceIndexBufferMemoryUsage",
];

pub const DEFAULT_LOG_FILE_NAME: &str = "log.txt";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapperConfig {
    /// Attributes holding node references
    pub node_attributes: Vec<String>,
    /// Elements removed from vehicle documents
    pub memory_tags: Vec<String>,
    /// Name of the run log written at each mod root
    pub log_file_name: String,
    /// Rewrite any attribute whose value decodes as an address
    pub rewrite_unlisted_attributes: bool,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            node_attributes: DEFAULT_NODE_ATTRIBUTES.iter().map(|s| s.to_string()).collect(),
            memory_tags: DEFAULT_MEMORY_TAGS.iter().map(|s| s.to_string()).collect(),
            log_file_name: DEFAULT_LOG_FILE_NAME.to_string(),
            rewrite_unlisted_attributes: true,
        }
    }
}

impl MapperConfig {
    /// Load from `path`, or the defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            debug!("No config file given, using defaults");
            return Ok(Self::default());
        };
        if !path.is_file() {
            return Err(I3dMapError::config_not_found(format!(
                "Config file does not exist: {}",
                path.display()
            ))
            .with_file_path(path));
        }
        let text = std::fs::read_to_string(path).map_err(|e| I3dMapError::from(e).with_file_path(path))?;
        let config = Self::from_json(&text).map_err(|e| e.with_file_path(path))?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)
            .map_err(|e| I3dMapError::config_invalid_format(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.node_attributes.is_empty() {
            return Err(I3dMapError::config_invalid_value(
                "node_attributes must list at least one attribute",
            ));
        }
        if let Some(blank) = self
            .node_attributes
            .iter()
            .chain(&self.memory_tags)
            .find(|name| name.trim().is_empty())
        {
            return Err(I3dMapError::config_invalid_value(format!(
                "Attribute and tag names must not be blank (got {blank:?})"
            )));
        }
        if self.log_file_name.is_empty()
            || self.log_file_name.contains(['/', '\\'])
        {
            return Err(I3dMapError::config_invalid_value(format!(
                "log_file_name must be a plain file name (got {:?})",
                self.log_file_name
            )));
        }
        Ok(())
    }

    pub fn rewrite_options(&self) -> RewriteOptions {
        RewriteOptions::new(
            self.node_attributes.iter().cloned(),
            self.rewrite_unlisted_attributes,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use i3dmap_error::ConfigErrorKind;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = MapperConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.memory_tags.len(), 6);
        assert!(config.rewrite_options().is_node_attribute("jointNode"));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = MapperConfig::from_json(r#"{ "memory_tags": ["audioMemoryUsage"] }"#).unwrap();
        assert_eq!(config.memory_tags, ["audioMemoryUsage"]);
        assert_eq!(config.log_file_name, "log.txt");
        assert_eq!(config.node_attributes.len(), DEFAULT_NODE_ATTRIBUTES.len());
    }

    #[test]
    fn test_invalid_json() {
        let err = MapperConfig::from_json("{ not json").unwrap_err();
        assert_eq!(err.config_kind(), Some(&ConfigErrorKind::InvalidFormat));
        let err = MapperConfig::from_json(r#"{ "unknown_key": 1 }"#).unwrap_err();
        assert_eq!(err.config_kind(), Some(&ConfigErrorKind::InvalidFormat));
    }

    #[test]
    fn test_invalid_values() {
        let err = MapperConfig::from_json(r#"{ "node_attributes": [] }"#).unwrap_err();
        assert_eq!(err.config_kind(), Some(&ConfigErrorKind::InvalidValue));
        let err = MapperConfig::from_json(r#"{ "log_file_name": "logs/run.txt" }"#).unwrap_err();
        assert_eq!(err.config_kind(), Some(&ConfigErrorKind::InvalidValue));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "rewrite_unlisted_attributes": false }}"#).unwrap();
        let config = MapperConfig::load(Some(file.path())).unwrap();
        assert!(!config.rewrite_unlisted_attributes);

        let missing = file.path().with_extension("missing");
        let err = MapperConfig::load(Some(&missing)).unwrap_err();
        assert_eq!(err.config_kind(), Some(&ConfigErrorKind::NotFound));
        assert_eq!(err.file_path(), Some(&missing));
    }
}
