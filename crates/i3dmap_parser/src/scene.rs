//! In-memory model of an i3d scene document
//!
//! The forest is the element children of `<Scene>`. Nodes live in an arena
//! indexed by [`NodeId`]; structure (parents, children, ordinals) is fixed at
//! parse time and only the resolved names can change afterwards.

use crate::address::Address;
use crate::edits::TextEdits;
use crate::xml;
use i3dmap_error::{I3dMapError, Result};
use log::debug;
use std::fmt;
use std::ops::Range;

/// Tag of the element whose children form the forest
pub const SCENE_TAG: &str = "Scene";
/// Attribute holding a node's name
pub const NAME_ATTRIBUTE: &str = "name";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Location of an attribute value inside the source text
#[derive(Debug, Clone, PartialEq, Eq)]
struct ValueSpan {
    range: Range<usize>,
    quote: char,
}

#[derive(Debug, Clone)]
pub struct SceneNode {
    tag: String,
    name: Option<String>,
    resolved_name: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    ordinal: usize,
    attributes: Vec<(String, String)>,
    line: u32,
    name_span: Option<ValueSpan>,
}

impl SceneNode {
    /// Element tag, e.g. `TransformGroup` or `Shape`
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Name as authored; `None` when the element has no or an empty name
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Name after duplicate resolution (equal to `name` until resolved)
    pub fn resolved_name(&self) -> Option<&str> {
        self.resolved_name.as_deref()
    }

    pub fn is_renamed(&self) -> bool {
        self.name != self.resolved_name
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Position among siblings (root-level nodes: among `<Scene>` children)
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// Attributes in document order, values unescaped
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// 1-based source line of the element's start tag
    pub fn line(&self) -> u32 {
        self.line
    }
}

#[derive(Debug, Clone)]
pub struct SceneForest {
    source: String,
    nodes: Vec<SceneNode>,
    roots: Vec<NodeId>,
}

impl SceneForest {
    /// Parse a scene document.
    ///
    /// Fails with `Document/Malformed` when the text is not well-formed XML
    /// and `Document/MissingScene` when the root has no `<Scene>` child.
    pub fn parse(text: &str) -> Result<Self> {
        let doc = xml::parse_document(text)?;
        let scene = xml::child_element(doc.root_element(), SCENE_TAG).ok_or_else(|| {
            I3dMapError::missing_scene(format!(
                "No <{SCENE_TAG}> element below <{}>",
                doc.root_element().tag_name().name()
            ))
        })?;

        let mut nodes: Vec<SceneNode> = Vec::new();
        let mut roots = Vec::new();
        // (element, parent in arena, ordinal among element siblings)
        let mut stack: Vec<(roxmltree::Node<'_, '_>, Option<NodeId>, usize)> = scene
            .children()
            .filter(|child| child.is_element())
            .enumerate()
            .map(|(ordinal, child)| (child, None, ordinal))
            .collect();
        stack.reverse();

        while let Some((element, parent, ordinal)) = stack.pop() {
            let id = NodeId(nodes.len());
            let name_attr = element
                .attributes()
                .find(|attr| attr.name() == NAME_ATTRIBUTE && !attr.value().is_empty());
            let name = name_attr.as_ref().map(|attr| attr.value().to_string());
            let name_span = name_attr.as_ref().map(|attr| {
                let range = attr.range_value();
                ValueSpan {
                    quote: xml::quote_before(text, range.start),
                    range,
                }
            });
            nodes.push(SceneNode {
                tag: element.tag_name().name().to_string(),
                resolved_name: name.clone(),
                name,
                parent,
                children: Vec::new(),
                ordinal,
                attributes: element
                    .attributes()
                    .map(|attr| (attr.name().to_string(), attr.value().to_string()))
                    .collect(),
                line: xml::line_at(&doc, element.range().start),
                name_span,
            });
            match parent {
                Some(parent) => nodes[parent.0].children.push(id),
                None => roots.push(id),
            }

            let mut children: Vec<_> = element
                .children()
                .filter(|child| child.is_element())
                .enumerate()
                .map(|(ordinal, child)| (child, Some(id), ordinal))
                .collect();
            children.reverse();
            stack.extend(children);
        }

        debug!(
            "Parsed scene forest: {} root(s), {} node(s)",
            roots.len(),
            nodes.len()
        );
        Ok(Self {
            source: text.to_string(),
            nodes,
            roots,
        })
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node(&self, id: NodeId) -> &SceneNode {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The unmodified document text
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Depth-first pre-order traversal in document order.
    ///
    /// This order is the contract that decides which duplicate receives
    /// which suffix, and the order of mapping entries.
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder {
            forest: self,
            stack: self.roots.iter().rev().copied().collect(),
        }
    }

    /// Positional address of a node, walked from the node up to its root
    pub fn address_of(&self, id: NodeId) -> Address {
        let mut ordinals = Vec::new();
        let mut current = self.node(id);
        while let Some(parent) = current.parent {
            ordinals.push(current.ordinal);
            current = self.node(parent);
        }
        ordinals.reverse();
        Address::new(current.ordinal, ordinals)
    }

    /// Node designated by an address, if it exists in this forest
    pub fn node_at(&self, address: &Address) -> Option<NodeId> {
        let mut current = *self.roots.get(address.root())?;
        for &ordinal in address.path() {
            current = *self.node(current).children.get(ordinal)?;
        }
        Some(current)
    }

    /// Every node whose resolved name equals `name`
    pub fn find_by_resolved_name(&self, name: &str) -> Vec<NodeId> {
        self.preorder()
            .filter(|&id| self.node(id).resolved_name() == Some(name))
            .collect()
    }

    /// Assign a resolved name. Unnamed nodes are left unnamed.
    pub fn set_resolved_name(&mut self, id: NodeId, resolved: String) {
        let node = &mut self.nodes[id.0];
        if node.name.is_some() {
            node.resolved_name = Some(resolved);
        }
    }

    /// Number of nodes whose resolved name differs from the authored one
    pub fn renamed_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_renamed()).count()
    }

    /// Render the document with resolved names written back.
    ///
    /// Only `name` attribute values of renamed nodes change; every other byte
    /// is copied from the source.
    pub fn serialize(&self) -> String {
        let mut edits = TextEdits::new();
        for node in self.nodes.iter().filter(|node| node.is_renamed()) {
            if let (Some(span), Some(resolved)) = (&node.name_span, &node.resolved_name) {
                edits.replace(
                    span.range.clone(),
                    xml::escape_attribute(resolved, span.quote),
                );
            }
        }
        edits.apply(&self.source)
    }
}

pub struct Preorder<'a> {
    forest: &'a SceneForest,
    stack: Vec<NodeId>,
}

impl Iterator for Preorder<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.forest.node(id).children.iter().rev().copied());
        Some(id)
    }
}
