//! Node Tree Library
//!
//! A library for building typed trees of named, addressable nodes: scene
//! graphs, configuration trees, object hierarchies.
//!
//! # Core Concepts
//!
//! - **NodeTree**: arena owning every node; all structure changes go through it
//! - **Node**: a named, typed element holding user data
//! - **Attachments**: a node has one current parent and may stay attached to
//!   previous parents until they explicitly let go
//! - **NodeHooks**: per-node behavior - parent validation, allow-lists and
//!   change notifications that travel up every attachment
//! - **TreeQuery**: path resolution, depth-bounded search and rendering
//!
//! # Example
//!
//! ```
//! use node_tree::prelude::*;
//!
//! let mut tree: NodeTree = NodeTree::new();
//! let root = tree.create("root");
//! let lights = tree.create("lights");
//! let sun = tree.insert(Node::typed("sun", NodeType::from_static("Light"), ()));
//!
//! tree.attach(root, lights).unwrap();
//! tree.attach_at(root, "lights", sun).unwrap();
//!
//! assert_eq!(tree.resolve_path(root, "lights/sun"), Some(sun));
//! assert_eq!(tree.find_by_type(root, "Light", Depth::Unbounded), vec![sun]);
//! print!("{}", tree.render_tree(root, &RenderOptions::default()));
//! ```

pub mod tree;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::tree::prelude::*;
}
