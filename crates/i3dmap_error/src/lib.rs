//! # i3dmap_error - Unified Error Handling
//!
//! This crate provides the error system shared by the i3dmap toolkit:
//! - One error type across the parser, editor and CLI crates
//! - Contextual information (file paths, source lines, node names, addresses)
//! - User-friendly messages for the run log and detailed ones for debugging
//!
//! ## Module Organization
//!
//! - [`types`] - Main error type and Result type alias
//! - [`kinds`] - Error kind enums for fine-grained categorization
//! - [`helpers`] - Convenient functions for creating standardized errors
//! - [`conversions`] - Type conversions and contextual methods

pub use kinds::*;
pub use types::*;

pub mod conversions;
pub mod helpers;
pub mod kinds;
pub mod types;
