//! Error conversion implementations and contextual methods

use crate::kinds::*;
use crate::types::I3dMapError;
use std::path::PathBuf;

// === From implementations for standard library types ===

impl From<std::io::Error> for I3dMapError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
            file_path: None,
            source_message: Some(format!("IO Error: {err:?}")),
        }
    }
}

// === Contextual builder methods ===

impl I3dMapError {
    /// Add file path context to any error type
    pub fn with_file_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        match &mut self {
            Self::Io { file_path, .. } => *file_path = Some(path.into()),
            Self::Document { file_path, .. } => *file_path = Some(path.into()),
            Self::Mapping { file_path, .. } => *file_path = Some(path.into()),
            Self::Config { config_path, .. } => *config_path = Some(path.into()),
            Self::Cli { .. } => {}
        }
        self
    }

    /// Attach the offending node name to mapping errors
    pub fn with_node_name<N: Into<String>>(mut self, name: N) -> Self {
        if let Self::Mapping { node_name, .. } = &mut self {
            *node_name = Some(name.into());
        }
        self
    }

    /// Attach the offending address text to mapping errors
    pub fn with_address<A: Into<String>>(mut self, text: A) -> Self {
        if let Self::Mapping { address, .. } = &mut self {
            *address = Some(text.into());
        }
        self
    }

    /// Add command context to CLI errors
    pub fn with_command<C: Into<String>>(mut self, command: C) -> Self {
        if let Self::Cli { command: cmd, .. } = &mut self {
            *cmd = Some(command.into());
        }
        self
    }
}

// === Type checking methods ===

impl I3dMapError {
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    pub fn is_document(&self) -> bool {
        matches!(self, Self::Document { .. })
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, Self::Mapping { .. })
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }

    /// True for invariant violations that point at a bug rather than bad input
    pub fn is_internal(&self) -> bool {
        matches!(
            self.mapping_kind(),
            Some(
                MappingErrorKind::DuplicateAddressCollision
                    | MappingErrorKind::DuplicateNameCollision
            )
        )
    }

    pub fn document_kind(&self) -> Option<&DocumentErrorKind> {
        match self {
            Self::Document { kind, .. } => Some(kind),
            _ => None,
        }
    }

    pub fn mapping_kind(&self) -> Option<&MappingErrorKind> {
        match self {
            Self::Mapping { kind, .. } => Some(kind),
            _ => None,
        }
    }

    pub fn config_kind(&self) -> Option<&ConfigErrorKind> {
        match self {
            Self::Config { kind, .. } => Some(kind),
            _ => None,
        }
    }
}

// === Accessors and display helpers ===

impl I3dMapError {
    /// Get the file path associated with this error, if any
    pub fn file_path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { file_path, .. } => file_path.as_ref(),
            Self::Document { file_path, .. } => file_path.as_ref(),
            Self::Mapping { file_path, .. } => file_path.as_ref(),
            Self::Config { config_path, .. } => config_path.as_ref(),
            Self::Cli { .. } => None,
        }
    }

    pub fn line(&self) -> Option<u32> {
        match self {
            Self::Document { line, .. } => *line,
            _ => None,
        }
    }

    pub fn node_name(&self) -> Option<&str> {
        match self {
            Self::Mapping { node_name, .. } => node_name.as_deref(),
            _ => None,
        }
    }

    pub fn address(&self) -> Option<&str> {
        match self {
            Self::Mapping { address, .. } => address.as_deref(),
            _ => None,
        }
    }

    /// Get a user-friendly error message suitable for CLI display
    pub fn user_message(&self) -> String {
        match self {
            Self::Io {
                message, file_path, ..
            } => {
                if let Some(path) = file_path {
                    format!("File error in '{}': {}", path.display(), message)
                } else {
                    message.clone()
                }
            }
            Self::Document {
                message,
                file_path,
                line,
                ..
            } => {
                let mut msg = format!("Document error: {message}");
                if let Some(path) = file_path {
                    msg.push_str(&format!(" (file: {})", path.display()));
                }
                if let Some(line) = line {
                    msg.push_str(&format!(" (line: {line})"));
                }
                msg
            }
            Self::Mapping {
                message,
                file_path,
                node_name,
                address,
                ..
            } => {
                let mut msg = format!("Mapping failed: {message}");
                if let Some(name) = node_name {
                    msg.push_str(&format!(" (node: {name})"));
                }
                if let Some(address) = address {
                    msg.push_str(&format!(" (address: {address})"));
                }
                if let Some(path) = file_path {
                    msg.push_str(&format!(" (file: {})", path.display()));
                }
                msg
            }
            Self::Config {
                message,
                config_path,
                ..
            } => {
                if let Some(path) = config_path {
                    format!("Configuration error in '{}': {}", path.display(), message)
                } else {
                    format!("Configuration error: {message}")
                }
            }
            Self::Cli {
                message, command, ..
            } => {
                if let Some(cmd) = command {
                    format!("Command '{cmd}' failed: {message}")
                } else {
                    format!("CLI error: {message}")
                }
            }
        }
    }

    /// Get a detailed error message with full context for debugging
    pub fn debug_message(&self) -> String {
        let mut msg = self.user_message();
        match self {
            Self::Document { kind, .. } => msg.push_str(&format!(" [Kind: {kind}]")),
            Self::Mapping { kind, .. } => msg.push_str(&format!(" [Kind: {kind}]")),
            Self::Config { kind, .. } => msg.push_str(&format!(" [Kind: {kind}]")),
            Self::Cli { kind, .. } => msg.push_str(&format!(" [Kind: {kind}]")),
            Self::Io {
                source_message: Some(source),
                ..
            } => msg.push_str(&format!(" [{source}]")),
            Self::Io { .. } => {}
        }
        msg
    }

    /// Get a short error summary without context details
    pub fn summary(&self) -> String {
        match self {
            Self::Io { message, .. } => format!("I/O: {message}"),
            Self::Document { kind, .. } => format!("Document: {kind}"),
            Self::Mapping { kind, .. } => format!("Mapping: {kind}"),
            Self::Config { kind, .. } => format!("Config: {kind}"),
            Self::Cli { kind, .. } => format!("CLI: {kind}"),
        }
    }
}
