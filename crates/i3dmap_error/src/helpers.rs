//! Helper functions for creating standardized errors

use crate::kinds::*;
use crate::types::I3dMapError;

impl I3dMapError {
    /// Create a new document error
    pub fn document<M: Into<String>>(message: M, kind: DocumentErrorKind) -> Self {
        Self::Document {
            message: message.into(),
            file_path: None,
            line: None,
            kind,
        }
    }

    /// Create a new mapping error
    pub fn mapping<M: Into<String>>(message: M, kind: MappingErrorKind) -> Self {
        Self::Mapping {
            message: message.into(),
            file_path: None,
            node_name: None,
            address: None,
            kind,
        }
    }

    /// Create a new config error
    pub fn config<M: Into<String>>(message: M, kind: ConfigErrorKind) -> Self {
        Self::Config {
            message: message.into(),
            config_path: None,
            kind,
        }
    }

    /// Create a new CLI error
    pub fn cli<M: Into<String>>(message: M, kind: CliErrorKind) -> Self {
        Self::Cli {
            message: message.into(),
            command: None,
            kind,
        }
    }

    // === Document Domain Helpers ===

    /// Document could not be parsed as well-formed XML
    pub fn malformed_document<M: Into<String>>(message: M) -> Self {
        Self::document(message, DocumentErrorKind::Malformed)
    }

    /// Malformed document with the 1-based line the parser stopped at
    pub fn malformed_document_at<M: Into<String>>(message: M, line: u32) -> Self {
        Self::Document {
            message: message.into(),
            file_path: None,
            line: Some(line),
            kind: DocumentErrorKind::Malformed,
        }
    }

    pub fn missing_scene<M: Into<String>>(message: M) -> Self {
        Self::document(message, DocumentErrorKind::MissingScene)
    }

    // === Mapping Domain Helpers ===

    /// Address text that cannot be decoded
    pub fn invalid_address<M: Into<String>, A: Into<String>>(message: M, address: A) -> Self {
        Self::mapping(message, MappingErrorKind::InvalidAddressSyntax).with_address(address)
    }

    /// A collision group outgrew the fixed suffix width
    pub fn capacity_exceeded<M: Into<String>, N: Into<String>>(message: M, name: N) -> Self {
        Self::mapping(message, MappingErrorKind::CapacityExceeded).with_node_name(name)
    }

    /// Internal consistency failure: two entries produced the same address
    pub fn duplicate_address<M: Into<String>, A: Into<String>>(message: M, address: A) -> Self {
        Self::mapping(message, MappingErrorKind::DuplicateAddressCollision).with_address(address)
    }

    /// Internal consistency failure: two entries produced the same name
    pub fn duplicate_name<M: Into<String>, N: Into<String>>(message: M, name: N) -> Self {
        Self::mapping(message, MappingErrorKind::DuplicateNameCollision).with_node_name(name)
    }

    pub fn node_not_found<M: Into<String>, A: Into<String>>(message: M, address: A) -> Self {
        Self::mapping(message, MappingErrorKind::NodeNotFound).with_address(address)
    }

    // === CLI Domain Helpers ===

    pub fn cli_execution_failed<M: Into<String>>(message: M) -> Self {
        Self::cli(message, CliErrorKind::ExecutionFailed)
    }
}

// === Config Domain Helpers ===

impl I3dMapError {
    pub fn config_not_found<M: Into<String>>(message: M) -> Self {
        Self::config(message, ConfigErrorKind::NotFound)
    }

    pub fn config_invalid_format<M: Into<String>>(message: M) -> Self {
        Self::config(message, ConfigErrorKind::InvalidFormat)
    }

    pub fn config_invalid_value<M: Into<String>>(message: M) -> Self {
        Self::config(message, ConfigErrorKind::InvalidValue)
    }
}
