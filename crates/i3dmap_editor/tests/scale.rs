//! 1,200 node scene, 40 colliding nodes across 6 names, 300 references of
//! which 30 point at addresses that no longer exist.

use i3dmap_editor::{ReportEntry, ReportSummary, RewriteOptions, ScenePass};
use std::collections::HashMap;

const GROUPS: usize = 20;
const PER_GROUP: usize = 60;
const DUPLICATES: [(&str, usize); 6] = [
    ("Light", 10),
    ("wheel", 8),
    ("beacon", 7),
    ("mirror", 6),
    ("exhaust", 5),
    ("wiper", 4),
];

/// Name of the i-th node in pre-order; every 30th node (offset 7) carries a
/// duplicated name
fn node_names() -> Vec<String> {
    let mut duplicates = DUPLICATES
        .iter()
        .flat_map(|(name, count)| std::iter::repeat_n(*name, *count));
    (0..GROUPS * PER_GROUP)
        .map(|i| match i % 30 {
            7 => duplicates.next().unwrap().to_string(),
            _ => format!("node_{i}"),
        })
        .collect()
}

fn address_of(i: usize) -> String {
    let (group, k) = (i / PER_GROUP, i % PER_GROUP);
    if k == 0 {
        format!("{group}>")
    } else {
        format!("{group}>{}", k - 1)
    }
}

fn scene_document(names: &[String]) -> String {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<i3D name=\"big\">\n  <Scene>\n");
    for group in 0..GROUPS {
        let base = group * PER_GROUP;
        out.push_str(&format!(
            "    <TransformGroup name=\"{}\" nodeId=\"{base}\">\n",
            names[base]
        ));
        for k in 1..PER_GROUP {
            out.push_str(&format!(
                "      <Shape name=\"{}\" nodeId=\"{}\" castsShadows=\"true\"/>\n",
                names[base + k],
                base + k
            ));
        }
        out.push_str("    </TransformGroup>\n");
    }
    out.push_str("  </Scene>\n</i3D>\n");
    out
}

/// 270 live references spread over the scene, 30 stale ones
fn vehicle_document() -> (String, Vec<(String, Option<usize>)>) {
    let mut refs = Vec::new();
    for r in 0..270 {
        let i = (r * 4 + 1) % (GROUPS * PER_GROUP);
        refs.push((address_of(i), Some(i)));
    }
    for r in 0..30 {
        let stale = if r % 2 == 0 {
            format!("{}>{}", GROUPS + r, r)
        } else {
            format!("{}>{}|{}", r % GROUPS, PER_GROUP + r, 0)
        };
        refs.push((stale, None));
    }

    let mut out = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<vehicle type=\"big\">\n    <parts>\n");
    for (n, (address, _)) in refs.iter().enumerate() {
        out.push_str(&format!(
            "        <part id=\"{n}\" node=\"{address}\" mass=\"{n}.5\" label=\"part {n}\"/>\n"
        ));
    }
    out.push_str("    </parts>\n</vehicle>\n");
    (out, refs)
}

#[test]
fn scale_scenario() {
    let names = node_names();
    let scene_text = scene_document(&names);
    let (vehicle_text, refs) = vehicle_document();

    let pass = ScenePass::run(&scene_text).unwrap();
    assert_eq!(pass.forest.len(), 1200);
    assert_eq!(pass.renames.len(), 40);
    assert_eq!(pass.table.len(), 1200);

    let outcome = pass
        .apply_to_vehicle(&vehicle_text, &RewriteOptions::default(), &[] as &[&str])
        .unwrap();
    let mut entries = pass.rename_entries();
    entries.extend(outcome.entries.iter().cloned());
    let summary = ReportSummary::from_entries(&entries);
    assert_eq!(summary.renamed, 40);
    assert_eq!(summary.rewritten, 270);
    assert_eq!(summary.unresolved, 30);
    assert_eq!(summary.invalid, 0);

    // Every resolved reference points at the node it addressed before
    let resolved: HashMap<String, String> = pass
        .table
        .entries()
        .iter()
        .map(|entry| (entry.address.encode(), entry.name.clone()))
        .collect();
    let doc = roxmltree::Document::parse(&outcome.document).unwrap();
    let parts: Vec<_> = doc
        .descendants()
        .filter(|node| node.has_tag_name("part"))
        .collect();
    assert_eq!(parts.len(), refs.len());
    for (n, (part, (address, target))) in parts.iter().zip(&refs).enumerate() {
        let expected = match target {
            Some(_) => resolved[address].as_str(),
            None => address.as_str(),
        };
        assert_eq!(part.attribute("node"), Some(expected));
        assert_eq!(part.attribute("id"), Some(n.to_string().as_str()));
        assert_eq!(part.attribute("mass"), Some(format!("{n}.5").as_str()));
        assert_eq!(part.attribute("label"), Some(format!("part {n}").as_str()));
    }

    // Duplicates got suffixed in encounter order
    let lights: Vec<&str> = pass
        .renames
        .iter()
        .filter(|rename| rename.old_name == "Light")
        .map(|rename| rename.new_name.as_str())
        .collect();
    assert_eq!(lights.len(), 10);
    assert_eq!(lights[0], "Light_001");
    assert_eq!(lights[9], "Light_010");

    // Outside the rewritten values and the appended block the text is unchanged
    let block_start = outcome.document.find("    <i3dMappings>").unwrap();
    let block_end =
        outcome.document.find("</i3dMappings>\n").unwrap() + "</i3dMappings>\n".len();
    let mut stripped = outcome.document.clone();
    stripped.replace_range(block_start..block_end, "");
    let mut expected = vehicle_text.clone();
    for (n, (address, target)) in refs.iter().enumerate() {
        if target.is_some() {
            expected = expected.replacen(
                &format!("<part id=\"{n}\" node=\"{address}\""),
                &format!("<part id=\"{n}\" node=\"{}\"", resolved[address]),
                1,
            );
        }
    }
    assert_eq!(stripped, expected);
    assert!(
        entries
            .iter()
            .filter(|entry| matches!(entry, ReportEntry::UnresolvedReference { .. }))
            .all(|entry| entry.site().is_some())
    );
}
