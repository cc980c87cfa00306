use crate::cli_args::SceneArgs;
use crate::commands::{CommandContext, load_scene};
use crate::util::{colorize_address, colorize_name, colorize_tag};
use i3dmap_error::{I3dMapError, Result};
use i3dmap_parser::Address;

pub fn cmd_lookup(scene: SceneArgs, address: String, ctx: &CommandContext) -> Result<()> {
    let decoded = Address::decode(address.trim())?;
    let pass = load_scene(&scene.scene)?;
    let id = pass.forest.node_at(&decoded).ok_or_else(|| {
        I3dMapError::node_not_found(
            format!("No node at {decoded} in {}", scene.scene.display()),
            decoded.encode(),
        )
    })?;

    let node = pass.forest.node(id);
    let name = node.resolved_name().unwrap_or("<unnamed>");
    ctx.output.print_result(&format!(
        "{} {} {}",
        colorize_address(&decoded.encode()),
        colorize_tag(node.tag()),
        colorize_name(name)
    ));
    if node.is_renamed() {
        if let Some(authored) = node.name() {
            ctx.output
                .print_info_fmt(format_args!("  authored name: {authored}"));
        }
    }
    ctx.output
        .print_info_fmt(format_args!("  line: {}", node.line()));
    for (key, value) in node.attributes() {
        ctx.output.print_info_fmt(format_args!("  {key}=\"{value}\""));
    }
    Ok(())
}
