use crate::cli_args::{SceneArgs, TreeFormatArgs};
use crate::commands::{CommandContext, load_scene};
use crate::util::{colorize_address, colorize_name, colorize_tag};
use i3dmap_error::Result;
use i3dmap_parser::{NodeId, SceneForest};
use text_trees::{FormatCharacters, StringTreeNode, TreeFormatting};

pub fn cmd_tree(scene: SceneArgs, format: TreeFormatArgs, ctx: &CommandContext) -> Result<()> {
    let pass = load_scene(&scene.scene)?;
    let label = scene
        .scene
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| scene.scene.display().to_string());
    let tree = StringTreeNode::with_child_nodes(
        label,
        build_text_trees(&pass.forest).into_iter(),
    );

    let format_chars = if format.ascii {
        FormatCharacters::ascii()
    } else {
        FormatCharacters::box_chars()
    };
    let formatting = TreeFormatting::dir_tree(format_chars);
    match tree.to_string_with_format(&formatting) {
        Ok(output) => ctx.output.print_result(output.trim_end()),
        Err(e) => ctx.output.print_error(&format!("Error formatting tree: {e}")),
    }
    ctx.output.print_info_fmt(format_args!(
        "{} node(s), {} mapped, {} duplicate name(s) to resolve",
        pass.forest.len(),
        pass.table.len(),
        pass.renames.len()
    ));
    Ok(())
}

/// One text tree per root-level node.
///
/// Built bottom-up over the reversed pre-order so deep scenes do not recurse
/// here; rendering in `text_trees` still walks the result recursively.
pub fn build_text_trees(forest: &SceneForest) -> Vec<StringTreeNode> {
    let mut built: Vec<Option<StringTreeNode>> = (0..forest.len()).map(|_| None).collect();
    let order: Vec<NodeId> = forest.preorder().collect();
    for &id in order.iter().rev() {
        let label = node_label(forest, id);
        let children = forest.node(id).children();
        let tree = if children.is_empty() {
            StringTreeNode::new(label)
        } else {
            let child_trees: Vec<StringTreeNode> = children
                .iter()
                .filter_map(|child| built[child.index()].take())
                .collect();
            StringTreeNode::with_child_nodes(label, child_trees.into_iter())
        };
        built[id.index()] = Some(tree);
    }
    forest
        .roots()
        .iter()
        .filter_map(|root| built[root.index()].take())
        .collect()
}

fn node_label(forest: &SceneForest, id: NodeId) -> String {
    let node = forest.node(id);
    let mut label = format!(
        "{} {}",
        colorize_address(&forest.address_of(id).encode()),
        colorize_tag(node.tag())
    );
    match (node.name(), node.resolved_name()) {
        (Some(name), Some(resolved)) if name != resolved => {
            label.push_str(&format!(" {} (was {name})", colorize_name(resolved)));
        }
        (_, Some(resolved)) => label.push_str(&format!(" {}", colorize_name(resolved))),
        _ => {}
    }
    label
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deep_scene_tree() {
        let depth = 1_000;
        let mut text = String::from("<i3D><Scene>");
        for i in 0..depth {
            text.push_str(&format!("<TransformGroup name=\"d{i}\">"));
        }
        for _ in 0..depth {
            text.push_str("</TransformGroup>");
        }
        text.push_str("<Shape name=\"tail\"/></Scene></i3D>");

        let forest = SceneForest::parse(&text).unwrap();
        let trees = build_text_trees(&forest);
        assert_eq!(trees.len(), 2);

        let formatting = TreeFormatting::dir_tree(FormatCharacters::ascii());
        let output = trees[0].to_string_with_format(&formatting).unwrap();
        assert_eq!(output.trim_end().lines().count(), depth);
        assert!(output.contains("d999"));
    }
}
