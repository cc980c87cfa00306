//! Reference Rewriter
//!
//! Scans a vehicle document for attribute values holding positional
//! addresses and replaces each resolvable one with the resolved name from the
//! mapping table. The mapping block is regenerated in the same pass. All
//! changes are splices against the source text, so attribute order, quoting,
//! comments and whitespace outside the touched values survive unchanged.

use crate::mapping::{BlockLayout, MappingTable};
use crate::report::{ReportEntry, Site};
use crate::{MAPPINGS_TAG, RewriteOptions};
use i3dmap_error::Result;
use i3dmap_parser::xml::{self, escape_attribute, quote_before};
use i3dmap_parser::{Address, Reference, TextEdits, looks_positional};
use log::{debug, info, warn};
use roxmltree::Node;
use std::ops::Range;

/// What happened to the `<i3dMappings>` block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockChange {
    /// No block existed; one was appended to the root element
    Inserted,
    /// The first existing block was replaced, `removed` further blocks deleted
    Replaced { removed: usize },
}

#[derive(Debug, Clone)]
pub struct VehicleRewrite {
    pub document: String,
    pub entries: Vec<ReportEntry>,
    pub block: BlockChange,
}

impl VehicleRewrite {
    pub fn rewritten_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| matches!(entry, ReportEntry::ReferenceRewritten { .. }))
            .count()
    }
}

/// Rewrite the positional references of a vehicle document.
///
/// Fails only when the document is not well-formed XML. Unresolved and
/// undecodable references are reported and left as they are.
pub fn rewrite(text: &str, table: &MappingTable, options: &RewriteOptions) -> Result<VehicleRewrite> {
    let doc = xml::parse_document(text)?;
    let mut edits = TextEdits::new();
    let mut entries = Vec::new();

    for element in doc.descendants().filter(|node| node.is_element()) {
        if inside_mapping_block(element) {
            continue;
        }
        for attr in element.attributes() {
            let node_attribute = options.is_node_attribute(attr.name());
            if !node_attribute && !options.rewrite_unlisted_attributes {
                continue;
            }
            let value_range = attr.range_value();
            let site = || Site {
                element: element.tag_name().name().to_string(),
                attribute: attr.name().to_string(),
                line: xml::line_at(&doc, value_range.start),
            };
            if let Some(new_value) =
                rewrite_value(attr.value(), node_attribute, table, &site, &mut entries)
            {
                let quote = quote_before(text, value_range.start);
                edits.replace(value_range, escape_attribute(&new_value, quote));
            }
        }
    }

    let block = place_mapping_block(text, &doc, table, &mut edits);
    let rewritten = edits.len();
    debug!("Applying {rewritten} edit(s) to vehicle document");

    Ok(VehicleRewrite {
        document: edits.apply(text),
        entries,
        block,
    })
}

/// New value for an attribute, if any part of it was rewritten.
///
/// Unlisted attributes are rewritten only when the whole trimmed value is one
/// address. A listed attribute may hold several whitespace-separated
/// addresses, but only when every token decodes; anything else that looks
/// positional is reported as one invalid value and left as it is.
fn rewrite_value(
    value: &str,
    node_attribute: bool,
    table: &MappingTable,
    site: &dyn Fn() -> Site,
    entries: &mut Vec<ReportEntry>,
) -> Option<String> {
    let tokens = token_ranges(value);
    let replacements: Vec<(Range<usize>, &str)> = match tokens.as_slice() {
        [] => return None,
        [range] => {
            let token = &value[range.clone()];
            match Reference::classify(token, node_attribute) {
                Reference::Positional(address) => {
                    let name = resolve_token(token, &address, table, site, entries)?;
                    vec![(range.clone(), name)]
                }
                Reference::Malformed { text, reason } => {
                    report_invalid(text, reason, site, entries);
                    return None;
                }
                Reference::Named(name) => {
                    if !table.contains_name(&name) {
                        debug!("'{name}' at {} is not a mapped node name", site());
                    }
                    return None;
                }
                Reference::Unrecognized(_) => return None,
            }
        }
        _ if !node_attribute => return None,
        _ => {
            let decoded: Vec<_> = tokens
                .iter()
                .map(|range| Address::decode(&value[range.clone()]))
                .collect();
            if let Some(position) = decoded.iter().position(|result| result.is_err()) {
                if tokens.iter().any(|range| looks_positional(&value[range.clone()])) {
                    let bad = &value[tokens[position].clone()];
                    report_invalid(
                        value.trim().to_string(),
                        format!("token '{bad}' is not a positional address"),
                        site,
                        entries,
                    );
                }
                return None;
            }
            tokens
                .iter()
                .zip(decoded)
                .filter_map(|(range, address)| {
                    let address = address.ok()?;
                    let token = &value[range.clone()];
                    resolve_token(token, &address, table, site, entries)
                        .map(|name| (range.clone(), name))
                })
                .collect()
        }
    };
    if replacements.is_empty() {
        return None;
    }
    let mut out = String::with_capacity(value.len());
    let mut cursor = 0;
    for (range, name) in replacements {
        out.push_str(&value[cursor..range.start]);
        out.push_str(name);
        cursor = range.end;
    }
    out.push_str(&value[cursor..]);
    Some(out)
}

/// Resolved name for one decoded token, reporting the outcome either way
fn resolve_token<'t>(
    token: &str,
    address: &Address,
    table: &'t MappingTable,
    site: &dyn Fn() -> Site,
    entries: &mut Vec<ReportEntry>,
) -> Option<&'t str> {
    match table.name_for(address) {
        Some(name) => {
            debug!("{token} -> {name}");
            entries.push(ReportEntry::ReferenceRewritten {
                site: site(),
                old_value: token.to_string(),
                new_value: name.to_string(),
            });
            Some(name)
        }
        None => {
            let site = site();
            warn!("No node at {token} for {site}, leaving it unchanged");
            entries.push(ReportEntry::UnresolvedReference {
                site,
                value: token.to_string(),
            });
            None
        }
    }
}

fn report_invalid(
    value: String,
    reason: String,
    site: &dyn Fn() -> Site,
    entries: &mut Vec<ReportEntry>,
) {
    let site = site();
    warn!("Cannot decode '{value}' at {site}: {reason}");
    entries.push(ReportEntry::InvalidAddress {
        site,
        value,
        reason,
    });
}

/// Byte ranges of the whitespace-separated tokens of a value
fn token_ranges(value: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut start = None;
    for (i, c) in value.char_indices() {
        match (c.is_whitespace(), start) {
            (true, Some(s)) => {
                ranges.push(s..i);
                start = None;
            }
            (false, None) => start = Some(i),
            _ => {}
        }
    }
    if let Some(s) = start {
        ranges.push(s..value.len());
    }
    ranges
}

fn is_mapping_block(node: Node<'_, '_>) -> bool {
    node.is_element() && node.tag_name().name() == MAPPINGS_TAG
}

fn inside_mapping_block(node: Node<'_, '_>) -> bool {
    node.ancestors().any(is_mapping_block)
}

fn place_mapping_block(
    text: &str,
    doc: &roxmltree::Document<'_>,
    table: &MappingTable,
    edits: &mut TextEdits,
) -> BlockChange {
    let root = doc.root_element();
    let newline = xml::newline_of(text).to_string();
    let unit = xml::indent_unit(text, root);
    let root_indent = xml::line_indent(text, root.range().start).unwrap_or("");

    let blocks: Vec<Node<'_, '_>> = doc
        .descendants()
        .filter(|node| {
            is_mapping_block(*node)
                && !node
                    .ancestors()
                    .skip(1)
                    .any(is_mapping_block)
        })
        .collect();

    if let Some((first, extra)) = blocks.split_first() {
        info!("Found existing <{MAPPINGS_TAG}>, replacing contents");
        let layout = BlockLayout {
            indent: xml::line_indent(text, first.range().start)
                .unwrap_or(root_indent)
                .to_string(),
            unit,
            newline,
        };
        edits.replace(first.range(), table.render_block(&layout));
        for block in extra {
            warn!(
                "Removing extra <{MAPPINGS_TAG}> at line {}",
                xml::line_at(doc, block.range().start)
            );
            edits.delete(xml::removal_range(text, block.range()));
        }
        return BlockChange::Replaced {
            removed: extra.len(),
        };
    }

    info!("Adding new <{MAPPINGS_TAG}> section");
    let layout = BlockLayout {
        indent: format!("{root_indent}{unit}"),
        unit,
        newline: newline.clone(),
    };
    let block = table.render_block(&layout);
    let range = root.range();
    let element_text = &text[range.clone()];

    if element_text.ends_with("/>") {
        let qname = root_qname(element_text);
        let head = element_text[..element_text.len() - 2].trim_end();
        let close_start = range.start + head.len();
        edits.replace(
            close_start..range.end,
            format!(
                ">{newline}{}{block}{newline}{root_indent}</{qname}>",
                layout.indent
            ),
        );
    } else if let Some(close_offset) = element_text.rfind("</") {
        let close_start = range.start + close_offset;
        match xml::line_indent(text, close_start) {
            Some(_) => edits.insert(
                xml::line_start(text, close_start),
                format!("{}{block}{newline}", layout.indent),
            ),
            None => edits.insert(
                close_start,
                format!("{newline}{}{block}{newline}{root_indent}", layout.indent),
            ),
        }
    }
    BlockChange::Inserted
}

/// Qualified tag name as written in the start tag
fn root_qname(element_text: &str) -> &str {
    let rest = element_text.trim_start_matches('<');
    let end = rest
        .find(|c: char| c.is_whitespace() || c == '/' || c == '>')
        .unwrap_or(rest.len());
    &rest[..end]
}
