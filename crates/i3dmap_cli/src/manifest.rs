//! Lookups in modDesc.xml manifests and vehicle XML files

use i3dmap_error::{DocumentErrorKind, I3dMapError, Result};
use i3dmap_parser::xml;

/// `xmlFilename` of every `storeItems/storeItem` in a modDesc.xml, in
/// document order. Items without the attribute are skipped.
pub fn store_item_files(text: &str) -> Result<Vec<String>> {
    let doc = xml::parse_document(text)?;
    let items: Vec<_> = doc
        .descendants()
        .filter(|node| {
            node.has_tag_name("storeItem")
                && node
                    .parent_element()
                    .is_some_and(|parent| parent.has_tag_name("storeItems"))
        })
        .collect();
    if items.is_empty() {
        return Err(I3dMapError::document(
            "No <storeItems><storeItem> entries found in modDesc",
            DocumentErrorKind::MissingStoreItems,
        ));
    }
    Ok(items
        .iter()
        .filter_map(|item| item.attribute("xmlFilename"))
        .filter(|name| !name.trim().is_empty())
        .map(str::to_string)
        .collect())
}

/// Text of the first `base/filename` element of a vehicle document
pub fn scene_filename(text: &str) -> Result<String> {
    let doc = xml::parse_document(text)?;
    doc.descendants()
        .find(|node| {
            node.has_tag_name("filename")
                && node
                    .parent_element()
                    .is_some_and(|parent| parent.has_tag_name("base"))
        })
        .and_then(|node| node.text())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            I3dMapError::document(
                "<base><filename> tag missing or empty",
                DocumentErrorKind::MissingBaseFilename,
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_items() {
        let text = r#"<modDesc descVersion="92">
            <storeItems>
                <storeItem xmlFilename="vehicles/tractor.xml"/>
                <storeItem/>
                <storeItem xmlFilename="vehicles\trailer.xml"/>
            </storeItems>
            <storeItem xmlFilename="ignored.xml"/>
        </modDesc>"#;
        assert_eq!(
            store_item_files(text).unwrap(),
            ["vehicles/tractor.xml", "vehicles\\trailer.xml"]
        );
    }

    #[test]
    fn test_no_store_items() {
        let err = store_item_files("<modDesc><title/></modDesc>").unwrap_err();
        assert_eq!(
            err.document_kind(),
            Some(&DocumentErrorKind::MissingStoreItems)
        );
    }

    #[test]
    fn test_scene_filename() {
        let text = "<vehicle><base>\n  <filename> vehicles/tractor.i3d </filename>\n</base></vehicle>";
        assert_eq!(scene_filename(text).unwrap(), "vehicles/tractor.i3d");
    }

    #[test]
    fn test_scene_filename_missing() {
        for text in [
            "<vehicle><base/></vehicle>",
            "<vehicle><base><filename>  </filename></base></vehicle>",
            "<vehicle><filename>x.i3d</filename></vehicle>",
        ] {
            let err = scene_filename(text).unwrap_err();
            assert_eq!(
                err.document_kind(),
                Some(&DocumentErrorKind::MissingBaseFilename)
            );
        }
    }
}
