//! Per-node behavior hooks
//!
//! Every node in a `NodeTree` owns one `NodeHooks` object. The tree consults
//! its predicates before structural changes and calls its notification
//! methods while they happen. Hooks observe the tree read-only through a
//! `NodeContext`; they cannot mutate structure from inside a callback.

use derive_more::Display;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::tree::{Node, NodeId, NodeTree, Tree};

/// Kind of structural change being reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Change {
    /// A link was added
    #[display(fmt = "Added")]
    Added,
    /// A link was removed
    #[display(fmt = "Removed")]
    Removed,
}

/// Read-only view handed to hooks: the tree plus the node being called
pub struct NodeContext<'a, D> {
    tree: &'a NodeTree<D>,
    this: NodeId,
    node: &'a Node<D>,
}

impl<'a, D> NodeContext<'a, D> {
    pub(crate) fn new(tree: &'a NodeTree<D>, this: NodeId, node: &'a Node<D>) -> Self {
        Self { tree, this, node }
    }

    /// The tree the node lives in
    pub fn tree(&self) -> &'a NodeTree<D> {
        self.tree
    }

    /// Handle of the node whose hooks are running
    pub fn id(&self) -> NodeId {
        self.this
    }

    /// The node whose hooks are running
    pub fn node(&self) -> &'a Node<D> {
        self.node
    }

    /// Look up another node in the same tree
    pub fn get(&self, id: NodeId) -> Option<&'a Node<D>> {
        self.tree.get(id)
    }
}

/// Behavior attached to a node
///
/// All methods have defaults: the only default restriction is that a node
/// may not become its own parent, and every notification is ignored.
/// Implementations override what they need; `RestrictivePolicy` is one such
/// implementation.
pub trait NodeHooks<D> {
    /// Whether this node accepts `parent` as a new parent
    fn is_valid_parent(&self, cx: &NodeContext<'_, D>, parent: NodeId) -> bool {
        parent != cx.id()
    }

    /// Whether this node lets `child` be attached to it
    fn accepts_child(&self, _cx: &NodeContext<'_, D>, _child: NodeId) -> bool {
        true
    }

    /// Whether this node lets `child` be detached from it
    fn releases_child(&self, _cx: &NodeContext<'_, D>, _child: NodeId) -> bool {
        true
    }

    /// Called when this node gains or loses a parent link
    fn on_parent_change(&mut self, _cx: &NodeContext<'_, D>, _change: Change, _parent: NodeId) {}

    /// Called when a direct child is added or removed
    fn on_child_change(&mut self, _cx: &NodeContext<'_, D>, _change: Change, _child: NodeId) {}

    /// Called when a node is added or removed anywhere below a direct child
    fn on_descendant_change(&mut self, _cx: &NodeContext<'_, D>, _change: Change, _node: NodeId) {}

    /// Called when a parent delivers a user-defined signal
    fn on_signal(&mut self, _cx: &NodeContext<'_, D>, _signal: &str, _sender: NodeId) {}
}

/// Hooks with every default behavior
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHooks;

impl<D> NodeHooks<D> for DefaultHooks {}
