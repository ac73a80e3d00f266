//! Core tree abstraction for hierarchical node structures
//!
//! This module provides an arena of named nodes that can be attached under
//! several parents at once, notify each other of structural changes, and be
//! looked up by path, name or type.

mod arena;
mod error;
mod hooks;
pub mod name;
mod node;
mod options;
mod policy;
mod query;
#[cfg(feature = "serde")]
mod snapshot;
mod traits;

pub use arena::NodeTree;
pub use error::{TreeError, TreeResult};
pub use hooks::{Change, DefaultHooks, NodeContext, NodeHooks};
pub use node::{Node, NodeId, NodeType};
pub use options::RenderOptions;
pub use policy::RestrictivePolicy;
pub use query::{Depth, TreeQuery};
#[cfg(feature = "serde")]
pub use snapshot::NodeSnapshot;
pub use traits::{TraversalOrder, Tree, TreeWalker};

/// Re-export common types for convenience
pub mod prelude {
    pub use super::{
        Change, Depth, Node, NodeContext, NodeHooks, NodeId, NodeTree, NodeType, RenderOptions,
        RestrictivePolicy, TraversalOrder, Tree, TreeError, TreeQuery, TreeResult,
    };
}
