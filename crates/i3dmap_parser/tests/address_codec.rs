//! Round-trip and addressing tests over generated scene documents

use i3dmap_parser::{Address, SceneForest};

/// Build a scene with `roots` root-level nodes, each a full tree of the
/// given `branching` and `depth`.
fn generated_scene(roots: usize, branching: usize, depth: usize) -> String {
    fn node(out: &mut String, label: &str, branching: usize, depth: usize) {
        if depth == 0 {
            out.push_str(&format!("<Shape name=\"{label}\"/>"));
            return;
        }
        out.push_str(&format!("<TransformGroup name=\"{label}\">"));
        for i in 0..branching {
            node(out, &format!("{label}_{i}"), branching, depth - 1);
        }
        out.push_str("</TransformGroup>");
    }

    let mut out = String::from("<i3D name=\"generated\"><Scene>");
    for r in 0..roots {
        node(&mut out, &format!("n{r}"), branching, depth);
    }
    out.push_str("</Scene></i3D>");
    out
}

#[test]
fn test_codec_round_trips_every_reachable_address() {
    let forest = SceneForest::parse(&generated_scene(3, 3, 4)).unwrap();
    assert_eq!(forest.len(), 3 * (1 + 3 + 9 + 27 + 81));

    for id in forest.preorder() {
        let address = forest.address_of(id);
        let text = address.encode();
        let decoded = Address::decode(&text).unwrap();
        assert_eq!(decoded, address, "round trip failed for {text}");
        assert_eq!(forest.node_at(&decoded), Some(id));
    }
}

#[test]
fn test_addresses_are_unique() {
    let forest = SceneForest::parse(&generated_scene(2, 4, 3)).unwrap();
    let mut seen = std::collections::HashSet::new();
    for id in forest.preorder() {
        assert!(seen.insert(forest.address_of(id)));
    }
    assert_eq!(seen.len(), forest.len());
}

#[test]
fn test_generated_labels_match_addresses() {
    // Labels encode the path, so n1_2_0 must live at 1>2|0
    let forest = SceneForest::parse(&generated_scene(2, 3, 2)).unwrap();
    let id = forest.node_at(&Address::new(1, vec![2, 0])).unwrap();
    assert_eq!(forest.node(id).name(), Some("n1_2_0"));
}

#[test]
fn test_deep_tree_does_not_recurse() {
    let depth = 1_000;
    let mut text = String::from("<i3D><Scene>");
    for i in 0..depth {
        text.push_str(&format!("<TransformGroup name=\"d{i}\">"));
    }
    for _ in 0..depth {
        text.push_str("</TransformGroup>");
    }
    text.push_str("</Scene></i3D>");

    let forest = SceneForest::parse(&text).unwrap();
    let leaf = forest.preorder().last().unwrap();
    let address = forest.address_of(leaf);
    assert_eq!(address.depth(), depth - 1);
    assert!(address.path().iter().all(|&ordinal| ordinal == 0));
}
