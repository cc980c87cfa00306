//! Error kind enums for different operation domains
//!
//! Each domain variant of [`I3dMapError`](crate::I3dMapError) carries one of
//! these kinds so callers can branch on the failure without parsing messages.

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Structural problems with a scene, vehicle or manifest document
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DocumentErrorKind {
    #[error("Malformed document")]
    Malformed,
    #[error("Missing <Scene> element")]
    MissingScene,
    #[error("Missing <base><filename> element")]
    MissingBaseFilename,
    #[error("Missing <storeItems><storeItem> entries")]
    MissingStoreItems,
}

/// Failures while naming, addressing or mapping scene nodes
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MappingErrorKind {
    #[error("Invalid address syntax")]
    InvalidAddressSyntax,
    #[error("Duplicate suffix capacity exceeded")]
    CapacityExceeded,
    #[error("Two mapping entries share an address")]
    DuplicateAddressCollision,
    #[error("Two mapping entries share a name")]
    DuplicateNameCollision,
    #[error("No node at address")]
    NodeNotFound,
}

/// Specific kinds of configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ConfigErrorKind {
    #[error("Configuration file not found")]
    NotFound,
    #[error("Invalid configuration format")]
    InvalidFormat,
    #[error("Invalid configuration value")]
    InvalidValue,
}

/// Specific kinds of CLI errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CliErrorKind {
    #[error("Command execution failed")]
    ExecutionFailed,
}
