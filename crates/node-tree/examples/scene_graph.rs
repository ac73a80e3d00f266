//! Example that builds a small scene graph and moves a node between parents
//!
//! Usage:
//!   RUST_LOG=debug cargo run --example scene_graph

use anyhow::{anyhow, Result};
use node_tree::prelude::*;

const MESH: NodeType = NodeType::from_static("Mesh");
const LIGHT: NodeType = NodeType::from_static("Light");

/// Prints every change reported below the node it is attached to
struct Inspector;

impl NodeHooks<()> for Inspector {
    fn on_child_change(&mut self, cx: &NodeContext<'_, ()>, change: Change, child: NodeId) {
        if let Some(child) = cx.get(child) {
            println!("[{}] child {}: {}", cx.node().name(), change, child);
        }
    }

    fn on_descendant_change(&mut self, cx: &NodeContext<'_, ()>, change: Change, node: NodeId) {
        if let Some(node) = cx.get(node) {
            println!("[{}] descendant {}: {}", cx.node().name(), change, node);
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let mut tree: NodeTree = NodeTree::new();
    let world = tree.insert_with_hooks(Node::named("world"), Inspector);
    let stage = tree.insert_with_hooks(
        Node::named("stage"),
        RestrictivePolicy::new()
            .allow_add("Mesh")
            .allow_add("Light")
            .allow_remove("Light"),
    );
    tree.attach(world, stage)?;

    let props = tree.create("props");
    tree.attach(world, props)?;

    let crate_mesh = tree.insert(Node::typed("crate", MESH, ()));
    let spot = tree.insert(Node::typed("spot", LIGHT, ()));
    tree.attach_at(world, "stage", crate_mesh)?;
    tree.attach_at(world, "stage", spot)?;

    // Move the light under props; stage keeps a historical link to it
    tree.attach(props, spot)?;
    println!();
    println!("spot is reachable as:");
    for path in tree.all_paths(spot) {
        println!("  {}", path);
    }

    // The stage only lets lights go
    if let Err(err) = tree.detach_by_name(stage, "crate") {
        println!("refused: {}", err);
    }
    tree.detach_by_name(stage, "spot")?;

    let found = tree
        .resolve_path(world, "props/spot")
        .ok_or_else(|| anyhow!("spot should live under props"))?;
    println!("spot now at {}", tree.path(found).unwrap_or_default());

    println!();
    println!("Scene:");
    let options = RenderOptions::new().include_types(true);
    print!("{}", tree.render_tree(world, &options));

    println!();
    println!(
        "{} nodes, {} meshes",
        tree.len(),
        tree.find_by_type(world, MESH.name(), Depth::Unbounded).len()
    );

    Ok(())
}
