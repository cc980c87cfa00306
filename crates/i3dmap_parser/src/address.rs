//! Positional node addresses
//!
//! An address names a node by position: the ordinal of its root-level
//! ancestor among the `<Scene>` children, then the ordinal of each
//! descendant among its siblings. The text form is `ROOT>A|B|C`, for
//! example `0>0|1|2`. A root-level node has an empty chain (`3>`).

use i3dmap_error::{I3dMapError, Result};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Separates the root selector from the ordinal chain
pub const ROOT_DELIMITER: char = '>';
/// Separates ordinals inside the chain
pub const ORDINAL_DELIMITER: char = '|';

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Address {
    root: usize,
    path: Vec<usize>,
}

impl Address {
    pub fn new(root: usize, path: Vec<usize>) -> Self {
        Self { root, path }
    }

    /// Address of a root-level node
    pub fn root_level(root: usize) -> Self {
        Self {
            root,
            path: Vec::new(),
        }
    }

    pub fn root(&self) -> usize {
        self.root
    }

    /// Sibling ordinals below the root-level node, root-most first
    pub fn path(&self) -> &[usize] {
        &self.path
    }

    /// Number of levels below the root-level node
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    pub fn is_root_level(&self) -> bool {
        self.path.is_empty()
    }

    /// Address of the `ordinal`-th child of this node
    pub fn child(&self, ordinal: usize) -> Self {
        let mut path = Vec::with_capacity(self.path.len() + 1);
        path.extend_from_slice(&self.path);
        path.push(ordinal);
        Self {
            root: self.root,
            path,
        }
    }

    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.path.split_last()?;
        Some(Self {
            root: self.root,
            path: rest.to_vec(),
        })
    }

    pub fn encode(&self) -> String {
        self.to_string()
    }

    /// Parse the `ROOT>A|B|C` text form
    pub fn decode(text: &str) -> Result<Self> {
        let Some((root_text, chain)) = text.split_once(ROOT_DELIMITER) else {
            return Err(I3dMapError::invalid_address(
                format!("missing '{ROOT_DELIMITER}' delimiter"),
                text,
            ));
        };
        let root = parse_ordinal(root_text, text, "root selector")?;
        if chain.is_empty() {
            return Ok(Self::root_level(root));
        }
        let path = chain
            .split(ORDINAL_DELIMITER)
            .map(|segment| parse_ordinal(segment, text, "ordinal"))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { root, path })
    }
}

fn parse_ordinal(segment: &str, text: &str, what: &str) -> Result<usize> {
    if segment.is_empty() {
        return Err(I3dMapError::invalid_address(
            format!("empty {what}"),
            text,
        ));
    }
    if !segment.bytes().all(|b| b.is_ascii_digit()) {
        return Err(I3dMapError::invalid_address(
            format!("{what} '{segment}' is not a non-negative integer"),
            text,
        ));
    }
    segment.parse::<usize>().map_err(|_| {
        I3dMapError::invalid_address(format!("{what} '{segment}' is out of range"), text)
    })
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{ROOT_DELIMITER}", self.root)?;
        for (i, ordinal) in self.path.iter().enumerate() {
            if i > 0 {
                write!(f, "{ORDINAL_DELIMITER}")?;
            }
            write!(f, "{ordinal}")?;
        }
        Ok(())
    }
}

impl FromStr for Address {
    type Err = I3dMapError;

    fn from_str(s: &str) -> Result<Self> {
        Self::decode(s)
    }
}

/// Cheap check for values that are meant as positional addresses.
///
/// Matches a leading root selector and delimiter (`\d+>`). Values that pass
/// this check but fail [`Address::decode`] are reported as malformed rather
/// than silently treated as names.
pub fn looks_positional(text: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[0-9]+>").expect("address prefix pattern is valid"))
        .is_match(text)
}
