use derive_more::Display;

use crate::tree::NodeId;

/// Result type for tree operations
pub type TreeResult<T> = Result<T, TreeError>;

/// Reasons a tree operation is rejected
///
/// Every rejection leaves the tree exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum TreeError {
    /// The handle does not refer to a live node
    #[display(fmt = "{} does not refer to a live node", _0)]
    UnknownNode(NodeId),

    /// No child or path segment with the given name
    #[display(fmt = "no node named \"{}\"", name)]
    NotFound { name: String },

    /// A sibling already carries the same name hash
    #[display(fmt = "a sibling named \"{}\" already exists", name)]
    DuplicateName { name: String },

    /// The child's validity predicate refused the parent
    #[display(fmt = "{} refused {} as its parent", child, parent)]
    InvalidParent { parent: NodeId, child: NodeId },

    /// The attachment would make a node its own ancestor
    #[display(fmt = "attaching {} under {} would create a cycle", child, parent)]
    Cycle { parent: NodeId, child: NodeId },

    /// The owner is neither the current nor a historical parent of the child
    #[display(fmt = "{} is not held by {}", child, owner)]
    NotOwned { owner: NodeId, child: NodeId },

    /// An allow-list rejected the node type
    #[display(fmt = "node type \"{}\" is not allowed here", kind)]
    PolicyRejected { kind: String },

    /// A typed lookup found a node of another type
    #[display(fmt = "expected a \"{}\" node, found \"{}\"", expected, found)]
    WrongKind { expected: String, found: String },
}

impl std::error::Error for TreeError {}
