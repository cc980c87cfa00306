//! Byte-range splicing over an unmodified source text
//!
//! Every rewrite in the toolkit is expressed as a set of disjoint
//! replacements against the original document. Bytes outside the replaced
//! ranges are copied through untouched.

use log::warn;
use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub range: Range<usize>,
    pub replacement: String,
}

#[derive(Debug, Clone, Default)]
pub struct TextEdits {
    edits: Vec<TextEdit>,
}

impl TextEdits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace<S: Into<String>>(&mut self, range: Range<usize>, replacement: S) {
        self.edits.push(TextEdit {
            range,
            replacement: replacement.into(),
        });
    }

    pub fn insert<S: Into<String>>(&mut self, pos: usize, text: S) {
        self.replace(pos..pos, text);
    }

    pub fn delete(&mut self, range: Range<usize>) {
        self.replace(range, String::new());
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Produce the edited text.
    ///
    /// Edits are applied in source order. An edit overlapping an earlier one
    /// is dropped with a warning; callers only ever produce disjoint edits.
    pub fn apply(&self, source: &str) -> String {
        let mut ordered: Vec<&TextEdit> = self.edits.iter().collect();
        ordered.sort_by_key(|edit| (edit.range.start, edit.range.end));

        let mut out = String::with_capacity(source.len());
        let mut cursor = 0;
        for edit in ordered {
            if edit.range.start < cursor || edit.range.end > source.len() {
                warn!(
                    "Skipping overlapping edit at {}..{}",
                    edit.range.start, edit.range.end
                );
                continue;
            }
            out.push_str(&source[cursor..edit.range.start]);
            out.push_str(&edit.replacement);
            cursor = edit.range.end;
        }
        out.push_str(&source[cursor..]);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_in_source_order() {
        let source = "<a x=\"1\" y=\"2\"/>";
        let mut edits = TextEdits::new();
        edits.replace(12..13, "two");
        edits.replace(6..7, "one");
        assert_eq!(edits.apply(source), "<a x=\"one\" y=\"two\"/>");
    }

    #[test]
    fn test_insert_and_delete() {
        let source = "abcdef";
        let mut edits = TextEdits::new();
        edits.insert(0, ">");
        edits.delete(2..4);
        edits.insert(6, "<");
        assert_eq!(edits.apply(source), ">abef<");
    }

    #[test]
    fn test_overlap_is_dropped() {
        let source = "abcdef";
        let mut edits = TextEdits::new();
        edits.replace(1..4, "X");
        edits.replace(2..3, "Y");
        assert_eq!(edits.apply(source), "aXef");
    }

    #[test]
    fn test_empty_edits_preserve_source() {
        let source = "<?xml version=\"1.0\"?>\r\n<a/>\r\n";
        assert_eq!(TextEdits::new().apply(source), source);
    }
}
