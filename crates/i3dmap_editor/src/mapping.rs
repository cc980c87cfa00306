//! Mapping Compiler: the canonical name <-> address table
//!
//! One entry per named node, in scene pre-order. The table is a bijection;
//! a second entry for an address or a name is an internal error.

use crate::{MAPPING_TAG, MAPPINGS_TAG};
use i3dmap_error::{I3dMapError, Result};
use i3dmap_parser::xml::escape_attribute;
use i3dmap_parser::{Address, SceneForest};
use log::{debug, info};
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MappingEntry {
    pub name: String,
    pub address: Address,
}

impl MappingEntry {
    pub fn new<N: Into<String>>(name: N, address: Address) -> Self {
        Self {
            name: name.into(),
            address,
        }
    }
}

/// Whitespace conventions used when rendering the block into a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockLayout {
    /// Indentation of the `<i3dMappings>` line itself
    pub indent: String,
    /// One nesting step
    pub unit: String,
    pub newline: String,
}

impl Default for BlockLayout {
    fn default() -> Self {
        Self {
            indent: "    ".to_string(),
            unit: "    ".to_string(),
            newline: "\n".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    entries: Vec<MappingEntry>,
    by_address: HashMap<Address, usize>,
    by_name: HashMap<String, usize>,
}

impl MappingTable {
    /// Build a table from entries, rejecting any repeated address or name
    pub fn from_entries<I: IntoIterator<Item = MappingEntry>>(entries: I) -> Result<Self> {
        let mut table = Self::default();
        for entry in entries {
            table.push(entry)?;
        }
        Ok(table)
    }

    /// Compile the table of a resolved forest.
    ///
    /// Every named node contributes `(resolved name, address)`; unnamed nodes
    /// are skipped. Must run after duplicate resolution, otherwise repeated
    /// names fail with `DuplicateNameCollision`.
    pub fn compile(forest: &SceneForest) -> Result<Self> {
        let mut table = Self::default();
        for id in forest.preorder() {
            let Some(name) = forest.node(id).resolved_name() else {
                continue;
            };
            table.push(MappingEntry::new(name, forest.address_of(id)))?;
        }
        info!(
            "Compiled mapping table: {} entr{} from {} node(s)",
            table.len(),
            if table.len() == 1 { "y" } else { "ies" },
            forest.len()
        );
        Ok(table)
    }

    fn push(&mut self, entry: MappingEntry) -> Result<()> {
        if let Some(&existing) = self.by_address.get(&entry.address) {
            return Err(I3dMapError::duplicate_address(
                format!(
                    "Address {} is claimed by both '{}' and '{}'",
                    entry.address, self.entries[existing].name, entry.name
                ),
                entry.address.encode(),
            ));
        }
        if self.by_name.contains_key(&entry.name) {
            return Err(I3dMapError::duplicate_name(
                format!("Name '{}' appears twice in the mapping table", entry.name),
                entry.name.as_str(),
            )
            .with_address(entry.address.encode()));
        }
        debug!("Mapping {} -> {}", entry.name, entry.address);
        let index = self.entries.len();
        self.by_address.insert(entry.address.clone(), index);
        self.by_name.insert(entry.name.clone(), index);
        self.entries.push(entry);
        Ok(())
    }

    /// Resolved name mapped to `address`
    pub fn name_for(&self, address: &Address) -> Option<&str> {
        self.by_address
            .get(address)
            .map(|&index| self.entries[index].name.as_str())
    }

    pub fn address_for(&self, name: &str) -> Option<&Address> {
        self.by_name
            .get(name)
            .map(|&index| &self.entries[index].address)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the `<i3dMappings>` element.
    ///
    /// The first line carries no indentation (the caller places it); every
    /// following line is indented relative to `layout.indent`.
    pub fn render_block(&self, layout: &BlockLayout) -> String {
        if self.entries.is_empty() {
            return format!("<{MAPPINGS_TAG} />");
        }
        let mut out = format!("<{MAPPINGS_TAG}>");
        for entry in &self.entries {
            out.push_str(&layout.newline);
            out.push_str(&layout.indent);
            out.push_str(&layout.unit);
            out.push_str(&format!(
                "<{MAPPING_TAG} id=\"{}\" node=\"{}\" />",
                escape_attribute(&entry.name, '"'),
                entry.address
            ));
        }
        out.push_str(&layout.newline);
        out.push_str(&layout.indent);
        out.push_str(&format!("</{MAPPINGS_TAG}>"));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::resolve;
    use i3dmap_error::MappingErrorKind;
    use std::collections::HashSet;

    fn resolved_forest(body: &str) -> SceneForest {
        let mut forest =
            SceneForest::parse(&format!("<i3D><Scene>{body}</Scene></i3D>")).unwrap();
        resolve(&mut forest).unwrap();
        forest
    }

    #[test]
    fn test_compile_in_preorder() {
        let forest = resolved_forest(
            r#"<TransformGroup name="root"><Shape name="body"/><Shape/><Light name="lamp"/></TransformGroup><Camera name="cam"/>"#,
        );
        let table = MappingTable::compile(&forest).unwrap();
        let entries: Vec<(String, String)> = table
            .entries()
            .iter()
            .map(|e| (e.name.clone(), e.address.encode()))
            .collect();
        assert_eq!(
            entries,
            [
                ("root".to_string(), "0>".to_string()),
                ("body".to_string(), "0>0".to_string()),
                ("lamp".to_string(), "0>2".to_string()),
                ("cam".to_string(), "1>".to_string()),
            ]
        );
    }

    #[test]
    fn test_compile_is_bijection_after_resolution() {
        let forest = resolved_forest(
            r#"<a name="x"><b name="x"/><c name="y"><d name="x"/></c></a><e name="y"/>"#,
        );
        let table = MappingTable::compile(&forest).unwrap();
        assert_eq!(table.len(), forest.len());
        let names: HashSet<_> = table.entries().iter().map(|e| &e.name).collect();
        let addresses: HashSet<_> = table.entries().iter().map(|e| &e.address).collect();
        assert_eq!(names.len(), table.len());
        assert_eq!(addresses.len(), table.len());
        for entry in table.entries() {
            assert_eq!(table.name_for(&entry.address), Some(entry.name.as_str()));
            assert_eq!(table.address_for(&entry.name), Some(&entry.address));
        }
    }

    #[test]
    fn test_compile_without_resolution_rejects_duplicates() {
        let forest =
            SceneForest::parse(r#"<i3D><Scene><a name="x"/><b name="x"/></Scene></i3D>"#).unwrap();
        let err = MappingTable::compile(&forest).unwrap_err();
        assert_eq!(
            err.mapping_kind(),
            Some(&MappingErrorKind::DuplicateNameCollision)
        );
        assert!(err.is_internal());
    }

    #[test]
    fn test_duplicate_address_rejected() {
        let address = Address::decode("0>1").unwrap();
        let err = MappingTable::from_entries([
            MappingEntry::new("a", address.clone()),
            MappingEntry::new("b", address),
        ])
        .unwrap_err();
        assert_eq!(
            err.mapping_kind(),
            Some(&MappingErrorKind::DuplicateAddressCollision)
        );
        assert_eq!(err.address(), Some("0>1"));
    }

    #[test]
    fn test_render_block() {
        let table = MappingTable::from_entries([
            MappingEntry::new("root", Address::root_level(0)),
            MappingEntry::new("a&b", Address::new(0, vec![1, 2])),
        ])
        .unwrap();
        let layout = BlockLayout {
            indent: "  ".to_string(),
            unit: "\t".to_string(),
            newline: "\r\n".to_string(),
        };
        assert_eq!(
            table.render_block(&layout),
            "<i3dMappings>\r\n  \t<i3dMapping id=\"root\" node=\"0>\" />\r\n  \t<i3dMapping id=\"a&amp;b\" node=\"0>1|2\" />\r\n  </i3dMappings>"
        );
    }

    #[test]
    fn test_render_empty_block() {
        let table = MappingTable::default();
        assert_eq!(table.render_block(&BlockLayout::default()), "<i3dMappings />");
    }
}
