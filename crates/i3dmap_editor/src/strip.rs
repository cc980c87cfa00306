//! Removal of debug-only elements (the memory usage tags the GIANTS editor
//! writes into vehicle documents)

use i3dmap_error::Result;
use i3dmap_parser::TextEdits;
use i3dmap_parser::xml;
use log::debug;

#[derive(Debug, Clone)]
pub struct StripOutcome {
    pub document: String,
    pub removed: usize,
}

/// Remove every element whose tag is in `tags`, together with its line when
/// it stands alone on one. Nested matches go with their outermost match.
pub fn strip_elements<S: AsRef<str>>(text: &str, tags: &[S]) -> Result<StripOutcome> {
    let doc = xml::parse_document(text)?;
    let is_target = |node: roxmltree::Node<'_, '_>| {
        node.is_element()
            && tags
                .iter()
                .any(|tag| tag.as_ref() == node.tag_name().name())
    };

    let mut edits = TextEdits::new();
    for node in doc.descendants().filter(|node| is_target(*node)) {
        if node.ancestors().skip(1).any(is_target) {
            continue;
        }
        debug!(
            "Removing <{}> at line {}",
            node.tag_name().name(),
            xml::line_at(&doc, node.range().start)
        );
        edits.delete(xml::removal_range(text, node.range()));
    }

    let removed = edits.len();
    Ok(StripOutcome {
        document: edits.apply(text),
        removed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_own_lines() {
        let text = "<vehicle>\n    <base/>\n    <textureMemoryUsage>12</textureMemoryUsage>\n    <audioMemoryUsage/>\n</vehicle>\n";
        let outcome =
            strip_elements(text, &["textureMemoryUsage", "audioMemoryUsage"]).unwrap();
        assert_eq!(outcome.removed, 2);
        assert_eq!(outcome.document, "<vehicle>\n    <base/>\n</vehicle>\n");
    }

    #[test]
    fn test_strip_inline() {
        let text = "<vehicle><base/><audioMemoryUsage/></vehicle>";
        let outcome = strip_elements(text, &["audioMemoryUsage"]).unwrap();
        assert_eq!(outcome.document, "<vehicle><base/></vehicle>");
    }

    #[test]
    fn test_nothing_to_strip() {
        let text = "<vehicle>\r\n  <base/>\r\n</vehicle>";
        let outcome = strip_elements(text, &["textureMemoryUsage"]).unwrap();
        assert_eq!(outcome.removed, 0);
        assert_eq!(outcome.document, text);
    }

    #[test]
    fn test_nested_match_counted_once() {
        let text = "<v><a><a/></a></v>";
        let outcome = strip_elements(text, &["a"]).unwrap();
        assert_eq!(outcome.removed, 1);
        assert_eq!(outcome.document, "<v></v>");
    }
}
