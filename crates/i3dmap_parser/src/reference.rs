//! Classification of attribute values that may reference a scene node

use crate::address::{Address, looks_positional};

/// How an attribute value refers to a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    /// Decodes as a positional address (`0>0|1|2`)
    Positional(Address),
    /// Looks positional but does not decode
    Malformed { text: String, reason: String },
    /// A node-reference attribute holding a name (already mapping-based)
    Named(String),
    /// Not a node reference
    Unrecognized(String),
}

impl Reference {
    /// Classify `value`.
    ///
    /// `node_attribute` says whether the attribute is one of the recognized
    /// node-reference attributes. Values of other attributes are still
    /// positional when they decode, but never malformed or named.
    pub fn classify(value: &str, node_attribute: bool) -> Self {
        match Address::decode(value) {
            Ok(address) => Self::Positional(address),
            Err(err) if node_attribute && looks_positional(value) => Self::Malformed {
                text: value.to_string(),
                reason: match err {
                    i3dmap_error::I3dMapError::Mapping { message, .. } => message,
                    other => other.to_string(),
                },
            },
            Err(_) if node_attribute && !value.is_empty() => Self::Named(value.to_string()),
            Err(_) => Self::Unrecognized(value.to_string()),
        }
    }

    pub fn is_positional(&self) -> bool {
        matches!(self, Self::Positional(_))
    }

    /// The original attribute text
    pub fn text(&self) -> String {
        match self {
            Self::Positional(address) => address.encode(),
            Self::Malformed { text, .. } | Self::Named(text) | Self::Unrecognized(text) => {
                text.clone()
            }
        }
    }
}
