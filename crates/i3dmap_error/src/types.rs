//! Main error type for the i3dmap toolkit

use crate::kinds::*;
use std::path::PathBuf;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The unified error type shared by every i3dmap crate
#[derive(Error, Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum I3dMapError {
    /// File system and I/O related errors
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
        file_path: Option<PathBuf>,
        // Source error kept as text so the error stays Clone
        #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
        source_message: Option<String>,
    },

    /// Document parsing and structure errors
    #[error("Document error: {message}")]
    Document {
        message: String,
        #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
        file_path: Option<PathBuf>,
        #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
        line: Option<u32>,
        kind: DocumentErrorKind,
    },

    /// Naming, addressing and mapping errors
    #[error("Mapping error: {message}")]
    Mapping {
        message: String,
        #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
        file_path: Option<PathBuf>,
        #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
        node_name: Option<String>,
        #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
        address: Option<String>,
        kind: MappingErrorKind,
    },

    /// Configuration loading errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
        config_path: Option<PathBuf>,
        kind: ConfigErrorKind,
    },

    /// CLI and user interface errors
    #[error("CLI error: {message}")]
    Cli {
        message: String,
        #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
        command: Option<String>,
        kind: CliErrorKind,
    },
}

/// Convenient result type for i3dmap operations
pub type Result<T> = std::result::Result<T, I3dMapError>;
